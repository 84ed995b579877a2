//! Registration Core - Shared types library.
//!
//! This crate provides common types used across the registration components:
//! - `web` - The server-rendered registration site
//! - `cli` - Command-line tools for schema and seed management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and length-bounded text

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
