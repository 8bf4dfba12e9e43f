//! Concrete adapter implementations for ports.

pub mod csv_operations_writer;
pub mod file_config_adapter;
pub mod file_report_source;
