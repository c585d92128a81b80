//! Utility functions
//!
//! Provides logging and input validation utilities.

pub mod logging;
pub mod validation;
