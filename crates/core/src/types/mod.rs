//! Core types for the iHUZA inventory dashboard.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date;
pub mod email;
pub mod id;
pub mod status;

pub use date::{format_added_date, parse_added_date};
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
