//! The color catalog, consumed as a read-only lookup table.
//!
//! Records come from the static dataset shipped with the application. The
//! catalog never changes after construction; it only answers membership
//! questions: which active colors belong to a family (by primary family,
//! the first entry in the record's family list) and which belong to a
//! category (by any listed category).

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::{ColorId, GroupKind, GroupToken, TokenError};

/// One color in the dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorRecord {
    /// Identifier, digits with an optional `bright-` prefix.
    pub id: String,
    /// Family names, primary first.
    #[serde(default)]
    pub families: Vec<String>,
    /// Branded collection names, unordered.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Archived colors stay in the dataset but leave every grouping.
    #[serde(default)]
    pub archived: bool,
}

impl ColorRecord {
    pub fn new<I, J>(id: impl Into<String>, families: I, categories: J) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
    {
        Self {
            id: id.into(),
            families: families.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
            archived: false,
        }
    }

    /// Marks the record as archived.
    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }
}

/// Errors raised while building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("record '{id}': {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: TokenError,
    },

    #[error("failed to parse catalog dataset: {0}")]
    Dataset(#[from] serde_json::Error),
}

/// Indexed view over the color dataset.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<ColorRecord>,
    ids: IndexSet<ColorId>,
    families: IndexMap<String, Vec<ColorId>>,
    categories: IndexMap<String, Vec<ColorId>>,
}

impl Catalog {
    /// Builds the membership indexes over the active (non-archived) records.
    ///
    /// Rejects records whose id does not parse and group names carrying the
    /// `:`/`,` delimiters, which would corrupt serialized payloads.
    pub fn new(records: Vec<ColorRecord>) -> Result<Self, CatalogError> {
        let mut ids = IndexSet::new();
        let mut families: IndexMap<String, Vec<ColorId>> = IndexMap::new();
        let mut categories: IndexMap<String, Vec<ColorId>> = IndexMap::new();

        for record in &records {
            let id: ColorId = record.id.parse().map_err(|source| {
                CatalogError::InvalidRecord {
                    id: record.id.clone(),
                    source,
                }
            })?;
            for name in record.families.iter().chain(&record.categories) {
                if name.contains(':') || name.contains(',') {
                    return Err(CatalogError::InvalidRecord {
                        id: record.id.clone(),
                        source: TokenError::ReservedDelimiter(name.clone()),
                    });
                }
            }
            if record.archived {
                continue;
            }
            if !ids.insert(id) {
                continue;
            }
            if let Some(primary) = record.families.first() {
                families.entry(primary.clone()).or_default().push(id);
            }
            for category in &record.categories {
                let members = categories.entry(category.clone()).or_default();
                if !members.contains(&id) {
                    members.push(id);
                }
            }
        }

        Ok(Self {
            records,
            ids,
            families,
            categories,
        })
    }

    /// Loads a catalog from the JSON dataset (an array of records).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ColorRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Active member ids of a family, catalog order. Unknown names are
    /// empty, not an error: a shared URL may predate a dataset change.
    pub fn family_members(&self, name: &str) -> &[ColorId] {
        self.families.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Active member ids of a category, catalog order.
    pub fn category_members(&self, name: &str) -> &[ColorId] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Member ids for either grouping axis.
    pub fn group_members(&self, group: &GroupToken) -> &[ColorId] {
        match group.kind {
            GroupKind::Family => self.family_members(&group.name),
            GroupKind::Category => self.category_members(&group.name),
        }
    }

    /// Families with at least one active member, in catalog order.
    pub fn families(&self) -> impl Iterator<Item = (&str, &[ColorId])> {
        self.families
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Categories with at least one active member, in catalog order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[ColorId])> {
        self.categories
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    /// Whether an active record with this id exists.
    pub fn contains(&self, id: ColorId) -> bool {
        self.ids.contains(&id)
    }

    /// Active records, dataset order.
    pub fn active(&self) -> impl Iterator<Item = &ColorRecord> {
        self.records.iter().filter(|record| !record.archived)
    }

    /// Every record, archived included.
    pub fn records(&self) -> &[ColorRecord] {
        &self.records
    }
}
