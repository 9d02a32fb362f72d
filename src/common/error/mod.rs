//! Unified error types for docx-redline.
//!
//! This module provides a unified error type that encompasses XML handling and
//! editing failures, presenting a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
