//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **Endpoint validation**: only HTTPS API base URLs (plain HTTP for loopback)
//! - **Terminal output**: sanitizing and truncating user-controlled chat text
//! - **Formatting**: human-readable byte sizes
//!
//! # Examples
//!
//! ```
//! use vodchat::util::{human_file_size, sanitize_for_terminal, truncate_to_width, validate_endpoint};
//!
//! let url = validate_endpoint("https://api.betterttv.net/3").unwrap();
//! assert_eq!(url.host_str(), Some("api.betterttv.net"));
//!
//! let line = sanitize_for_terminal("gg\nwp");
//! assert_eq!(truncate_to_width(&line, 4), "g...");
//!
//! assert_eq!(human_file_size(2_000_000), "2 MB");
//! ```

mod format;
mod text;
mod url_validator;

pub use format::human_file_size;
pub use text::{sanitize_for_terminal, truncate_to_width};
pub use url_validator::{validate_endpoint, UrlValidationError};
