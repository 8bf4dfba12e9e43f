//! btreport: backtest report normalizer.
//!
//! Hexagonal architecture: the report pipeline in [`domain`], collaborator
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
