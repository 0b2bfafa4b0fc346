//! Storekeep Core - Shared types library.
//!
//! This crate provides common types used across all Storekeep components:
//! - `admin` - The administrative backend server
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//! Database encodings for the newtypes are available behind the `mysql`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, contact fields, order
//!   codes, and entity statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
