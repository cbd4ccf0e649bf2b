//! `bugboard`: a role-based bug tracking dashboard.
//!
//! Developers file and manage bugs; managers review aggregate statistics and
//! approve closures. The library is organised around three pieces:
//!
//! - [`engine`] enforces the bug lifecycle and actor permissions
//! - [`view`] derives filtered, sorted lists and trend series
//! - [`storage`] defines the record store contract and its implementations
//!
//! [`dashboard::Dashboard`] ties them together over a local record cache.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod storage;
pub mod util;
pub mod validation;
pub mod view;

pub use error::{BugError, ErrorCode, Result, StructuredError};
