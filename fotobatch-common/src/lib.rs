//! # Fotobatch Common Library
//!
//! Shared code for the fotobatch tools including:
//! - Record model (photo records, archive cards, merged records)
//! - Mapping store model and persistence
//! - Run configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod fsio;
pub mod mappings;
pub mod records;

pub use error::{Error, Result};
