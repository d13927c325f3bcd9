//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the runtime:
//! - Math types and operations
//! - Fixed-step time management
//! - Logging utilities

pub mod math;
pub mod time;
pub mod logging;
