//! Storage side of MinStore.
//!
//! The HTTP layer talks to storage only through the [`Driver`] trait. This crate
//! defines that contract together with:
//!
//! - [`DriverError`], the typed failures a driver reports, and its mapping to
//!   [`ApiError`](minstore_model::ApiError) (the error mapper).
//! - [`MemoryDriver`], a thread-safe in-memory backend.
//! - Bucket name and object key validation, MD5 helpers, and [`ServerConfig`].

pub mod checksums;
pub mod config;
pub mod driver;
pub mod error;
pub mod memory;
pub mod validation;

pub use config::ServerConfig;
pub use driver::{ByteStream, Driver};
pub use error::{DriverError, DriverResult};
pub use memory::MemoryDriver;
