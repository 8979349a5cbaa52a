//! # Swatchlink - shareable URL state for a paint-color catalog
//!
//! Swatchlink keeps a catalog browser's favorite and hidden color
//! selections inside the page URL, so any view state can be shared as a
//! plain link. No server, no storage, nothing beyond the query string.
//!
//! ## Overview
//!
//! State flows through a fixed pipeline on every mutation:
//! 1. The store updates its in-memory id set
//! 2. Fully-selected families/categories **consolidate** into group tokens
//!    (`family:Red` instead of every Red id)
//! 3. Numeric ids are **varint**-packed and **base85**-encoded; group
//!    tokens ride alongside with a position mask preserving order
//! 4. The transport writes the payload into the query string in one batch
//!
//! Loading runs the same pipeline backwards, expanding group tokens against
//! the catalog. Malformed payloads never break startup: a corrupted or
//! hand-edited URL degrades to an empty selection.
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use swatchlink::{Catalog, ColorId, ColorRecord, StateStore, UrlTransport};
//! use url::Url;
//!
//! let catalog = Arc::new(Catalog::new(vec![
//!     ColorRecord::new("1747", ["Blue"], Vec::<String>::new()),
//!     ColorRecord::new("2997", ["Blue"], Vec::<String>::new()),
//! ]).unwrap());
//!
//! let url = Url::parse("https://paints.example/catalog").unwrap();
//! let mut store = StateStore::load(UrlTransport::new(url), catalog.clone());
//!
//! let id: ColorId = "1747".parse().unwrap();
//! store.toggle_favorite(id).unwrap();
//! assert!(store.url().query().unwrap().starts_with("favorites="));
//!
//! // The URL alone reproduces the state.
//! let reloaded = StateStore::load(store.transport().clone(), catalog);
//! assert_eq!(reloaded.favorites(), vec![id]);
//! ```
//!
//! ## Modules
//!
//! - [`token`]: typed identifier tokens (color ids and group tokens)
//! - [`codec`]: varint packing, base85 transcoding, payload compression
//! - [`catalog`]: the read-only color dataset and its group indexes
//! - [`groups`]: group expansion and consolidation
//! - [`store`]: the favorites/hidden state store
//! - [`transport`]: query-string reads and batched writes

pub mod catalog;
pub mod codec;
pub mod groups;
pub mod store;
pub mod token;
pub mod transport;

// Re-export commonly used types at the crate root
pub use catalog::{Catalog, CatalogError, ColorRecord};
pub use codec::{
    compress, decompress, from_base85, to_base85, Base85Error, CompressError, DecompressError,
    VarIntError, MAX_ID,
};
pub use groups::{consolidate, expand};
pub use store::{StateStore, StoreError, FAVORITES_PARAM, HIDDEN_PARAM};
pub use token::{ColorId, GroupKind, GroupToken, IdentifierToken, TokenError};
pub use transport::{ParamUpdate, UrlTransport};
