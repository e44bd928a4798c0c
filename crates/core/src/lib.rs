//! ShopFusion Core - Shared types library.
//!
//! This crate provides common types used across all ShopFusion components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure derivations - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Wire types for the ShopFusion REST backend, newtype IDs, and
//!   display-only total derivations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
