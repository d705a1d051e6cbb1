// Presentation layer - rendering reports for the terminal
pub mod report_writer;
