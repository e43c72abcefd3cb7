//! Rate-limit tracking, request throttling, and configuration.
//!
//! This crate provides the shared mutable state behind the Paisa dispatcher:
//!
//! - [`RateLimitTracker`] maps blocked subjects (credentials or models) to
//!   the instant they become eligible again, with lazy expiry.
//! - [`RequestThrottle`] enforces a process-wide minimum spacing between
//!   request starts, shared by every credential/model combination.
//! - [`PaisaConfig`] loads tuning values and the model preference list from
//!   bundled TOML defaults with user overrides; credentials come from the
//!   environment only.
//!
//! Both stateful types are cheap to share behind an `Arc`; constructing a
//! fresh pair resets all rate-limit state, which is how tests isolate
//! scenarios.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod throttle;
mod tracker;

pub use config::{
    CREDENTIAL_ENV, DispatchConfig, EndpointConfig, ModelsConfig, PaisaConfig,
    credentials_from_env, is_configured,
};
pub use throttle::RequestThrottle;
pub use tracker::{RateLimitTracker, Subject, secs_ceil};
