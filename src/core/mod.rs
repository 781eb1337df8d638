//! Core module - shared data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Path normalization utilities
//! - SVG file discovery
//! - Hashing and text helpers

pub mod discover;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
