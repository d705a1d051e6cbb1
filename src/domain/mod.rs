// Domain layer - catalog, readings, analysis results and reports
pub mod analysis;
pub mod batch;
pub mod catalog;
pub mod parameter;
pub mod report;
pub mod telemetry;
