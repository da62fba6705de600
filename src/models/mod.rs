//! Contentful record types.

mod asset;
mod entry;
mod user;

pub use asset::*;
pub use entry::*;
pub use user::*;
