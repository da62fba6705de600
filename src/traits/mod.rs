//! Trait definitions for Contentful operations.
//!
//! Each record type implements the traits it supports, encapsulating
//! endpoint differences in the implementations.

mod list;

pub use list::{List, CREATION_ORDER};
