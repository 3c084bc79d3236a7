//! Content module - the source of items that skin the cards
//!
//! The session never loads anything itself. It asks a [`ContentProvider`] for
//! `pairs` distinct items and deals whatever comes back:
//!
//! - A short list is a degraded but playable board, not an error
//! - Transport failures surface as [`ContentError`]
//! - Loading is the only asynchronous step of a session
//!
//! [`CatalogProvider`] serves random items from a [`Catalog`], either the
//! built-in hairstyle set or one loaded from JSON.
//!
//! # Example
//!
//! ```
//! use memory_match_content::{Category, CatalogProvider, ContentProvider};
//!
//! let provider = CatalogProvider::builtin()
//!     .with_category(Category::Women)
//!     .with_seed(7);
//!
//! let items = tokio_test::block_on(provider.get_items(4)).unwrap();
//! assert_eq!(items.len(), 4);
//! ```

pub mod catalog;
pub mod provider;

pub use memory_match_types as types;

pub use catalog::{Catalog, Category};
pub use provider::{CatalogProvider, ContentError, ContentProvider};
