//! Report normalization pipeline.

pub mod raw_table;
pub mod extract;
pub mod header;
pub mod table;
pub mod order_type;
pub mod mt;
pub mod gbx;
pub mod coerce;
pub mod schema;
pub mod format;
pub mod pipeline;
pub mod config_validation;
pub mod error;
