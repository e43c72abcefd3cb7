//! Error types for the Paisa library.
//!
//! This crate provides the foundation error types used throughout the Paisa
//! ecosystem.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use paisa_error::{PaisaResult, HttpError};
//!
//! fn fetch_data() -> PaisaResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod dispatch;
mod error;
mod http;
mod insight;
mod json;

pub use config::ConfigError;
pub use dispatch::{DispatchError, DispatchErrorKind};
pub use error::{PaisaError, PaisaErrorKind, PaisaResult};
pub use http::HttpError;
pub use insight::InsightError;
pub use json::JsonError;
