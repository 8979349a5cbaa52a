//! Integration tests for Swatchlink
//!
//! Note: loading NEVER fails - a malformed or stale URL degrades to an
//! empty selection, which is always a valid starting point.
//!
//! Covered end to end:
//! - URL round trips (toggle, reload, same state)
//! - Group consolidation keeping shared URLs short
//! - Favorites/hidden independence
//! - Graceful recovery from corrupted payloads

use std::sync::Arc;

use swatchlink::{
    compress, decompress, Catalog, ColorId, ColorRecord, GroupToken, IdentifierToken, StateStore,
    UrlTransport,
};
use url::Url;

// Red = {10, 20, 30}; Blue = {1747, 2997, 3005}; Neon = {bright-42,
// bright-43}; category Classics = {2997, bright-42}; 99 is archived.
fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(vec![
            ColorRecord::new("10", ["Red"], Vec::<String>::new()),
            ColorRecord::new("20", ["Red"], Vec::<String>::new()),
            ColorRecord::new("30", ["Red"], Vec::<String>::new()),
            ColorRecord::new("1747", ["Blue"], Vec::<String>::new()),
            ColorRecord::new("2997", ["Blue"], ["Classics"]),
            ColorRecord::new("3005", ["Blue"], Vec::<String>::new()),
            ColorRecord::new("bright-42", ["Neon"], ["Classics"]),
            ColorRecord::new("bright-43", ["Neon"], Vec::<String>::new()),
            ColorRecord::new("99", ["Green"], Vec::<String>::new()).archived(),
        ])
        .unwrap(),
    )
}

fn store_at(url: &str) -> StateStore {
    StateStore::load(UrlTransport::new(Url::parse(url).unwrap()), catalog())
}

fn id(raw: &str) -> ColorId {
    raw.parse().unwrap()
}

/// Scenario: a fresh URL carries no state.
#[test]
fn test_empty_url_means_empty_sets() {
    let store = store_at("https://paints.example/catalog");
    assert!(store.favorites().is_empty());
    assert!(store.hidden().is_empty());
}

/// Scenario: toggling favorites writes a payload that survives a reload.
#[test]
fn test_favorites_roundtrip_through_shared_link() {
    let mut store = store_at("https://paints.example/catalog");
    store.toggle_favorite(id("1747")).unwrap();
    store.toggle_favorite(id("2997")).unwrap();

    // The parameter decompresses back to the two ids, in toggle order.
    let payload = store.transport().param("favorites").unwrap();
    let tokens = decompress(&payload).unwrap();
    assert_eq!(
        tokens,
        vec![
            IdentifierToken::Color(id("1747")),
            IdentifierToken::Color(id("2997")),
        ]
    );

    // Opening the same link reproduces the same set.
    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.favorites(), [id("1747"), id("2997")]);
    assert!(reloaded.hidden().is_empty());
}

/// Scenario: hiding a whole family compresses to one group token, and
/// unhiding one member expands back to the remaining bare ids.
#[test]
fn test_hiding_whole_family_consolidates() {
    let mut store = store_at("https://paints.example/catalog");
    store.add_hidden(&[id("10"), id("20"), id("30")]).unwrap();

    let payload = store.transport().param("hidden").unwrap();
    assert_eq!(payload, ".family:Red");

    store.toggle_hidden(id("10")).unwrap();
    let payload = store.transport().param("hidden").unwrap();
    let tokens = decompress(&payload).unwrap();
    assert_eq!(
        tokens,
        vec![
            IdentifierToken::Color(id("20")),
            IdentifierToken::Color(id("30")),
        ]
    );
}

/// Scenario: the consolidated family URL reloads to the full member set.
#[test]
fn test_family_token_reload() {
    let mut store = store_at("https://paints.example/catalog");
    store.add_hidden(&[id("10"), id("20"), id("30")]).unwrap();

    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.hidden(), [id("10"), id("20"), id("30")]);
}

/// Scenario: hiding every member of a branded category consolidates to a
/// category token even though the members span two families.
#[test]
fn test_hiding_whole_category_consolidates() {
    let mut store = store_at("https://paints.example/catalog");
    store.add_hidden(&[id("2997"), id("bright-42")]).unwrap();

    let payload = store.transport().param("hidden").unwrap();
    assert_eq!(payload, ".category:Classics");

    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.hidden(), [id("2997"), id("bright-42")]);
}

/// Scenario: a favorited member does not block family-level consolidation
/// of the hidden set, and the exclusion survives a reload.
#[test]
fn test_favorited_member_does_not_block_hidden_consolidation() {
    let mut store = store_at("https://paints.example/catalog");
    store.toggle_favorite(id("10")).unwrap();
    store.add_hidden(&[id("20"), id("30")]).unwrap();

    let payload = store.transport().param("hidden").unwrap();
    assert_eq!(payload, ".family:Red");

    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.favorites(), [id("10")]);
    assert_eq!(reloaded.hidden(), [id("20"), id("30")]);
}

/// Scenario: favorited and hidden at the same time; clearing one set never
/// touches the other.
#[test]
fn test_sets_are_independent() {
    let mut store = store_at("https://paints.example/catalog");
    store.toggle_favorite(id("1747")).unwrap();
    store.toggle_hidden(id("1747")).unwrap();
    assert!(store.is_favorite(id("1747")));
    assert!(store.is_hidden(id("1747")));

    store.clear_favorites().unwrap();
    assert!(!store.is_favorite(id("1747")));
    assert!(store.is_hidden(id("1747")));
}

#[test]
fn test_bright_ids_roundtrip() {
    let mut store = store_at("https://paints.example/catalog");
    store.toggle_favorite(id("bright-42")).unwrap();

    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.favorites(), [id("bright-42")]);
}

/// A corrupted payload degrades to an empty set instead of failing startup.
#[test]
fn test_malformed_payload_degrades_to_empty() {
    // ',' is outside the base85 alphabet.
    let store = store_at("https://paints.example/catalog?favorites=ab,cd");
    assert!(store.favorites().is_empty());

    // Truncated varint behind a valid base85 region.
    let truncated = swatchlink::to_base85(&[0x80]);
    let store = store_at(&format!(
        "https://paints.example/catalog?hidden={truncated}"
    ));
    assert!(store.hidden().is_empty());
}

/// A group token for a family the dataset no longer has contributes
/// nothing; the rest of the payload still loads.
#[test]
fn test_unknown_group_token_is_ignored() {
    let store = store_at("https://paints.example/catalog?hidden=.family:Discontinued");
    assert!(store.hidden().is_empty());

    let payload = compress(&[
        IdentifierToken::Color(id("1747")),
        IdentifierToken::Group(GroupToken::family("Discontinued").unwrap()),
    ])
    .unwrap();
    let store = store_at(&format!("https://paints.example/catalog?hidden={payload}"));
    assert_eq!(store.hidden(), [id("1747")]);
}

/// Unrelated query parameters survive every mutation, order included.
#[test]
fn test_unrelated_parameters_preserved() {
    let mut store = store_at("https://paints.example/catalog?tab=grid&sort=lrv");
    store.toggle_favorite(id("1747")).unwrap();
    store.toggle_hidden(id("10")).unwrap();

    let query = store.url().query().unwrap();
    assert!(query.starts_with("tab=grid&sort=lrv&favorites="));
    assert_eq!(store.url().path(), "/catalog");
}

/// Clearing a set removes its parameter entirely.
#[test]
fn test_clear_removes_parameter() {
    let mut store = store_at("https://paints.example/catalog?tab=grid");
    store.toggle_favorite(id("1747")).unwrap();
    assert!(store.transport().param("favorites").is_some());

    store.clear_favorites().unwrap();
    assert!(store.transport().param("favorites").is_none());
    assert_eq!(store.url().query(), Some("tab=grid"));
}

/// Archived colors never resurface through a stale group token.
#[test]
fn test_archived_colors_stay_out_of_expansion() {
    let store = store_at("https://paints.example/catalog?hidden=.family:Green");
    assert!(store.hidden().is_empty());
}

/// Scenario: a family name carrying a query metacharacter survives the
/// write and the reload intact.
#[test]
fn test_group_name_with_reserved_characters_roundtrips() {
    let catalog = Arc::new(
        Catalog::new(vec![
            ColorRecord::new("10", ["A&B"], Vec::<String>::new()),
            ColorRecord::new("20", ["A&B"], Vec::<String>::new()),
        ])
        .unwrap(),
    );
    let url = Url::parse("https://paints.example/catalog").unwrap();
    let mut store = StateStore::load(UrlTransport::new(url), catalog.clone());
    store.add_hidden(&[id("10"), id("20")]).unwrap();

    // The raw query escapes the '&'; the decoded parameter is intact.
    assert_eq!(store.url().query(), Some("hidden=.family:A%26B"));
    assert_eq!(
        store.transport().param("hidden").as_deref(),
        Some(".family:A&B")
    );

    let reloaded = StateStore::load(store.transport().clone(), catalog);
    assert_eq!(reloaded.hidden(), [id("10"), id("20")]);
}

/// Scenario: a mutation ordering where both parameters would end up
/// holding the same family token; the later write keeps its ids bare so
/// the reload stays unambiguous.
#[test]
fn test_colliding_family_token_stays_bare_on_later_write() {
    let mut store = store_at("https://paints.example/catalog");
    store.toggle_favorite(id("10")).unwrap();
    store.toggle_favorite(id("30")).unwrap();
    store.toggle_hidden(id("20")).unwrap();
    store.toggle_favorite(id("10")).unwrap();
    store.toggle_favorite(id("10")).unwrap();

    let payload = store.transport().param("favorites").unwrap();
    assert_eq!(
        decompress(&payload).unwrap(),
        vec![
            IdentifierToken::Color(id("10")),
            IdentifierToken::Color(id("30")),
        ]
    );

    let reloaded = StateStore::load(store.transport().clone(), catalog());
    assert_eq!(reloaded.favorites(), [id("10"), id("30")]);
    assert_eq!(reloaded.hidden(), [id("20")]);
}
