//! The favorites/hidden state store.
//!
//! Owns the two id sets for the lifetime of a page view: loads them from
//! the URL at construction (decompress, then expand group tokens) and
//! writes them back after every mutation (consolidate against the catalog,
//! compress, one batched query update). The sets only ever hold individual
//! color ids; group tokens exist in the serialized URL form alone.
//!
//! The two sets are independent: a color may be favorited and hidden at
//! the same time; display precedence is the view's concern, not ours. A
//! group token lives in at most one parameter at a time, though: the same
//! token in both cannot be reconstructed at load, so the later writer
//! keeps those ids bare.
//!
//! Error policy follows the load/persist boundary: a malformed payload in
//! the URL degrades to an empty set (a corrupted or hand-edited link must
//! not break startup), while a persist failure is logged and propagated
//! with both the URL and the in-memory set left as they were.

use std::sync::Arc;

use indexmap::IndexSet;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::codec::compress::{compress, decompress, CompressError};
use crate::groups::{consolidate, expand};
use crate::token::{ColorId, GroupToken, IdentifierToken};
use crate::transport::{ParamUpdate, UrlTransport};

/// Query parameter carrying the favorites payload.
pub const FAVORITES_PARAM: &str = "favorites";

/// Query parameter carrying the hidden payload.
pub const HIDDEN_PARAM: &str = "hidden";

/// Errors surfaced by state mutations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Serializing a set failed. The URL and the set keep their previous
    /// value; an id large enough to overflow the codec is a dataset bug.
    #[error("failed to serialize the '{param}' parameter: {source}")]
    Persist {
        param: &'static str,
        #[source]
        source: CompressError,
    },
}

/// Favorites and hidden sets, synchronized with the URL.
pub struct StateStore {
    transport: UrlTransport,
    catalog: Arc<Catalog>,
    favorites: IndexSet<ColorId>,
    hidden: IndexSet<ColorId>,
}

impl StateStore {
    /// Builds a store from the URL held by `transport`.
    ///
    /// The favorites payload is expanded first, excluding the bare ids of
    /// the hidden payload; the hidden payload is then expanded excluding
    /// the loaded favorites. This mirrors the exclusions applied when the
    /// payloads were consolidated, so a reload reproduces the same sets.
    pub fn load(transport: UrlTransport, catalog: Arc<Catalog>) -> Self {
        let favorite_tokens = read_tokens(&transport, FAVORITES_PARAM);
        let hidden_tokens = read_tokens(&transport, HIDDEN_PARAM);

        let hidden_bare: IndexSet<ColorId> = hidden_tokens
            .iter()
            .filter_map(IdentifierToken::as_color)
            .collect();
        let favorites = expand_to_ids(&favorite_tokens, &catalog, &hidden_bare);
        let hidden = expand_to_ids(&hidden_tokens, &catalog, &favorites);

        Self {
            transport,
            catalog,
            favorites,
            hidden,
        }
    }

    /// The URL reflecting the current state.
    pub fn url(&self) -> &url::Url {
        self.transport.url()
    }

    pub fn transport(&self) -> &UrlTransport {
        &self.transport
    }

    /// Favorited ids, insertion order.
    pub fn favorites(&self) -> Vec<ColorId> {
        self.favorites.iter().copied().collect()
    }

    /// Hidden ids, insertion order.
    pub fn hidden(&self) -> Vec<ColorId> {
        self.hidden.iter().copied().collect()
    }

    pub fn is_favorite(&self, id: ColorId) -> bool {
        self.favorites.contains(&id)
    }

    pub fn is_hidden(&self, id: ColorId) -> bool {
        self.hidden.contains(&id)
    }

    /// Adds the id to favorites, or removes it when already present.
    pub fn toggle_favorite(&mut self, id: ColorId) -> Result<(), StoreError> {
        let mut next = self.favorites.clone();
        if !next.shift_remove(&id) {
            next.insert(id);
        }
        self.commit_favorites(next)
    }

    /// Adds the id to hidden, or removes it when already present.
    pub fn toggle_hidden(&mut self, id: ColorId) -> Result<(), StoreError> {
        let mut next = self.hidden.clone();
        if !next.shift_remove(&id) {
            next.insert(id);
        }
        self.commit_hidden(next)
    }

    pub fn add_favorites(&mut self, ids: &[ColorId]) -> Result<(), StoreError> {
        let mut next = self.favorites.clone();
        next.extend(ids.iter().copied());
        self.commit_favorites(next)
    }

    pub fn remove_favorites(&mut self, ids: &[ColorId]) -> Result<(), StoreError> {
        let mut next = self.favorites.clone();
        for id in ids {
            next.shift_remove(id);
        }
        self.commit_favorites(next)
    }

    pub fn add_hidden(&mut self, ids: &[ColorId]) -> Result<(), StoreError> {
        let mut next = self.hidden.clone();
        next.extend(ids.iter().copied());
        self.commit_hidden(next)
    }

    pub fn remove_hidden(&mut self, ids: &[ColorId]) -> Result<(), StoreError> {
        let mut next = self.hidden.clone();
        for id in ids {
            next.shift_remove(id);
        }
        self.commit_hidden(next)
    }

    pub fn clear_favorites(&mut self) -> Result<(), StoreError> {
        self.commit_favorites(IndexSet::new())
    }

    pub fn clear_hidden(&mut self) -> Result<(), StoreError> {
        self.commit_hidden(IndexSet::new())
    }

    fn commit_favorites(&mut self, next: IndexSet<ColorId>) -> Result<(), StoreError> {
        let reserved = serialized_groups(&self.transport, HIDDEN_PARAM);
        let update = serialize_set(&next, &self.hidden, &reserved, &self.catalog, FAVORITES_PARAM)?;
        self.transport.batch_update([(FAVORITES_PARAM, update)]);
        self.favorites = next;
        Ok(())
    }

    fn commit_hidden(&mut self, next: IndexSet<ColorId>) -> Result<(), StoreError> {
        let reserved = serialized_groups(&self.transport, FAVORITES_PARAM);
        let update = serialize_set(&next, &self.favorites, &reserved, &self.catalog, HIDDEN_PARAM)?;
        self.transport.batch_update([(HIDDEN_PARAM, update)]);
        self.hidden = next;
        Ok(())
    }
}

/// Reads and decompresses one payload parameter. Malformed payloads are
/// logged and treated as absent.
fn read_tokens(transport: &UrlTransport, param: &'static str) -> Vec<IdentifierToken> {
    let Some(payload) = transport.param(param) else {
        return Vec::new();
    };
    match decompress(&payload) {
        Ok(tokens) => tokens,
        Err(err) => {
            log::warn!("ignoring malformed '{param}' parameter: {err}");
            Vec::new()
        }
    }
}

fn expand_to_ids(
    tokens: &[IdentifierToken],
    catalog: &Catalog,
    exclude: &IndexSet<ColorId>,
) -> IndexSet<ColorId> {
    expand(tokens, Some(catalog), exclude)
        .into_iter()
        .filter_map(|token| token.as_color())
        .collect()
}

/// Group tokens currently serialized into a parameter. Malformed payloads
/// reserve nothing.
fn serialized_groups(transport: &UrlTransport, param: &'static str) -> IndexSet<GroupToken> {
    read_tokens(transport, param)
        .into_iter()
        .filter_map(|token| match token {
            IdentifierToken::Group(group) => Some(group),
            IdentifierToken::Color(_) => None,
        })
        .collect()
}

/// Consolidates and compresses one set into a parameter update.
///
/// A group token in `reserved` (already serialized into the opposite
/// parameter) is never formed here as well; its member ids stay bare.
fn serialize_set(
    set: &IndexSet<ColorId>,
    exclude: &IndexSet<ColorId>,
    reserved: &IndexSet<GroupToken>,
    catalog: &Catalog,
    param: &'static str,
) -> Result<ParamUpdate, StoreError> {
    let tokens: Vec<IdentifierToken> = set.iter().map(|id| IdentifierToken::Color(*id)).collect();
    let mut consolidated: Vec<IdentifierToken> = Vec::with_capacity(tokens.len());
    let mut bare: IndexSet<ColorId> = IndexSet::new();
    for token in consolidate(&tokens, Some(catalog), exclude) {
        match token {
            IdentifierToken::Color(id) => {
                bare.insert(id);
                consolidated.push(IdentifierToken::Color(id));
            }
            IdentifierToken::Group(group) if reserved.contains(&group) => {
                for id in catalog.group_members(&group) {
                    if set.contains(id) && bare.insert(*id) {
                        consolidated.push(IdentifierToken::Color(*id));
                    }
                }
            }
            token => consolidated.push(token),
        }
    }
    let payload = compress(&consolidated).map_err(|source| {
        log::error!("leaving '{param}' unchanged: {source}");
        StoreError::Persist { param, source }
    })?;
    if payload.is_empty() {
        Ok(ParamUpdate::Delete)
    } else {
        Ok(ParamUpdate::Set(payload))
    }
}
