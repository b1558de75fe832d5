//! # tagfill Common Library
//!
//! Shared code for the tagfill workspace:
//! - Error and result types
//! - TOML configuration file loading and key validation

pub mod config;
pub mod error;

pub use error::{Error, Result};
