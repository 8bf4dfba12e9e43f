//! Collaborator port traits.

pub mod config_port;
pub mod report_source;
pub mod operations_sink;
