//! Group expansion and consolidation against the catalog.
//!
//! These two operations keep shared URLs short: when every active member of
//! a family or category sits in a state set, the member ids collapse into a
//! single group token; expansion is the inverse applied at load time.
//!
//! Membership is always computed over active records only (primary family
//! for family tokens, every listed category for category tokens), minus
//! the caller's exclusion set. Excluding the opposite state set keeps a color
//! that is simultaneously favorited and hidden from blocking a family-level
//! collapse of the hidden set (and vice versa).
//!
//! With no catalog both operations degrade to a passthrough that returns
//! the tokens unchanged.

use indexmap::IndexSet;

use crate::catalog::Catalog;
use crate::token::{ColorId, GroupKind, GroupToken, IdentifierToken};

/// Resolves group tokens to their current member ids.
///
/// Bare ids pass through unchanged. Unknown group names contribute nothing:
/// a shared URL may reference a family the dataset no longer has. The
/// result is deduplicated, first appearance wins.
pub fn expand(
    tokens: &[IdentifierToken],
    catalog: Option<&Catalog>,
    exclude: &IndexSet<ColorId>,
) -> Vec<IdentifierToken> {
    let Some(catalog) = catalog else {
        return tokens.to_vec();
    };

    let mut out: IndexSet<IdentifierToken> = IndexSet::with_capacity(tokens.len());
    for token in tokens {
        match token {
            IdentifierToken::Color(id) => {
                out.insert(IdentifierToken::Color(*id));
            }
            IdentifierToken::Group(group) => {
                for id in catalog.group_members(group) {
                    if !exclude.contains(id) {
                        out.insert(IdentifierToken::Color(*id));
                    }
                }
            }
        }
    }
    out.into_iter().collect()
}

/// Collapses fully-present groups into group tokens.
///
/// A family or category collapses when its entire active membership, minus
/// `exclude`, is nonempty and contained in the bare ids of `tokens`. Ids
/// not covered by any collapsed group stay bare. Pre-existing group tokens
/// pass through, so consolidating an already-consolidated list yields the
/// same list.
///
/// Output order is deterministic: uncovered ids in input order, then
/// passed-through group tokens, then new family tokens, then new category
/// tokens (families and categories in catalog order).
pub fn consolidate(
    tokens: &[IdentifierToken],
    catalog: Option<&Catalog>,
    exclude: &IndexSet<ColorId>,
) -> Vec<IdentifierToken> {
    let Some(catalog) = catalog else {
        return tokens.to_vec();
    };

    let mut ids: IndexSet<ColorId> = IndexSet::new();
    let mut passthrough: Vec<GroupToken> = Vec::new();
    for token in tokens {
        match token {
            IdentifierToken::Color(id) => {
                ids.insert(*id);
            }
            IdentifierToken::Group(group) => {
                if !passthrough.contains(group) {
                    passthrough.push(group.clone());
                }
            }
        }
    }

    let mut covered: IndexSet<ColorId> = IndexSet::new();
    let mut formed: Vec<GroupToken> = Vec::new();
    {
        let mut collapse = |kind: GroupKind, name: &str, members: &[ColorId]| {
            let members: Vec<ColorId> = members
                .iter()
                .copied()
                .filter(|id| !exclude.contains(id))
                .collect();
            if members.is_empty() || !members.iter().all(|id| ids.contains(id)) {
                return;
            }
            let token = GroupToken {
                kind,
                name: name.to_string(),
            };
            if !passthrough.contains(&token) {
                formed.push(token);
            }
            covered.extend(members);
        };
        for (name, members) in catalog.families() {
            collapse(GroupKind::Family, name, members);
        }
        for (name, members) in catalog.categories() {
            collapse(GroupKind::Category, name, members);
        }
    }

    let mut out: Vec<IdentifierToken> = ids
        .iter()
        .filter(|id| !covered.contains(*id))
        .map(|id| IdentifierToken::Color(*id))
        .collect();
    out.extend(passthrough.into_iter().map(IdentifierToken::Group));
    out.extend(formed.into_iter().map(IdentifierToken::Group));
    out
}
