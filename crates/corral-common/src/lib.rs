//! # corral-common
//!
//! Shared types for the Corral network management API.
//!
//! This crate provides common functionality used across all Corral crates:
//! - Opaque object ID generation and validation
//! - Common error types

#![warn(missing_docs)]

pub mod error;
pub mod id;

pub use error::{CorralError, CorralResult};
pub use id::ObjectId;
