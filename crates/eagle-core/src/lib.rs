//! Eagle Send - Core Library
//!
//! Catalog client, environment detection, metadata formatting and the send
//! handlers behind the image and video nodes.

pub mod client;
pub mod environment;
pub mod error;
pub mod folder_cache;
pub mod metadata;
pub mod nodes;
pub mod path;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::*;
pub use environment::*;
pub use error::*;
pub use folder_cache::*;
pub use metadata::*;
pub use nodes::*;
pub use path::*;
pub use transport::*;
pub use types::*;
