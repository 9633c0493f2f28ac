//! Core types and configuration for the croft field simulation.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use types::*;
