// Application layer - decoding, analysis and use cases
pub mod batch_accumulator;
pub mod converter;
pub mod device_service;
pub mod diagnostic_assembler;
pub mod diagnostic_service;
pub mod extractor;
pub mod record_decoder;
pub mod spike_analyzer;
pub mod telemetry_repository;
