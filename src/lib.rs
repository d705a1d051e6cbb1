//! Vehicle telemetry diagnostics engine.
//!
//! Decodes raw device I/O and OBD-II parameters through a fixed catalog,
//! computes per-parameter batch statistics, flags statistical spikes and
//! packages the worst offenders into a serializable [`DiagnosticReport`].
//!
//! The engine entry points ([`convert`], [`extract_all`], [`analyze`],
//! [`assemble`]) are pure functions over in-memory data and never fail:
//! unusual input is reported in the returned values.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

pub use application::batch_accumulator::{BatchAccumulator, accumulate};
pub use application::converter::convert;
pub use application::diagnostic_assembler::assemble;
pub use application::extractor::{ExtractedReading, extract_all, extract_named};
pub use application::record_decoder::{decode_record, decode_records};
pub use application::spike_analyzer::analyze;
pub use domain::analysis::{DomainThreshold, Severity, SpikeAnalysisResult, ThresholdTable};
pub use domain::catalog::Catalog;
pub use domain::report::DiagnosticReport;
pub use domain::telemetry::{ConvertedValue, TelemetryReading};
pub use error::RecordError;
