//! Printastic Core - Shared domain types.
//!
//! This crate provides common types used across the Printastic client SDK:
//! - `client` - Session-aware HTTP client and feature services
//! - `integration-tests` - End-to-end tests against a mock backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
