//! Core types for ShopFusion.
//!
//! Wire shapes mirror the ShopFusion REST backend JSON (camelCase fields).

pub mod cart;
pub mod catalog;
pub mod id;

pub use cart::{Cart, CartItem, Totals, TAX_RATE};
pub use catalog::{Category, Product, ProductPage};
pub use id::*;
