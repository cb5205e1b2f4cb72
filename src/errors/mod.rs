//! # Error Handling
//!
//! Error types for the patch generator. The structured value encoder reports
//! [`EncodingError`]; everything else goes through [`Error`].

pub mod types;

pub use types::{EncodingError, Error, Result, TrafficDirection};
