//! Query-string reads and batched writes.
//!
//! Sole owner of URL mutation: the store's persist step funnels every change
//! through [`UrlTransport::batch_update`], which applies a whole batch in a
//! single query rewrite. Semantics are "replace": the current URL is
//! rewritten in place, never appended to a history list. The path, the
//! fragment, and unrelated parameters (order included) are left untouched.
//!
//! Written values are percent-encoded. The base85 region is query-safe by
//! construction, but group names may carry reserved characters like `&`
//! (which would split the pair) or `%` (which would decode lossily). Reads
//! percent-decode, so values round-trip byte for byte.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Bytes escaped in written values: the escape character itself, the pair
/// separator, and everything the URL serializer would escape anyway.
const VALUE_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'<')
    .add(b'>');

/// One pending change in a [`UrlTransport::batch_update`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamUpdate {
    /// Set a scalar value.
    Set(String),
    /// Set a comma-joined list value.
    SetList(Vec<String>),
    /// Remove the parameter.
    Delete,
}

/// Read/write access to the query parameters of one URL.
#[derive(Debug, Clone)]
pub struct UrlTransport {
    url: Url,
}

impl UrlTransport {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// The URL in its current state.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Scalar value of `name`, percent-escapes decoded. Missing parameters
    /// and parameters with an empty value both read back as they are.
    pub fn param(&self, name: &str) -> Option<String> {
        self.raw_pairs()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| decode(value))
    }

    /// Comma-delimited list value of `name`; empty segments are dropped.
    pub fn array_param(&self, name: &str) -> Vec<String> {
        match self.param(name) {
            None => Vec::new(),
            Some(value) => value
                .split(',')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Applies every change in one query rewrite.
    ///
    /// Updated parameters keep their position; new ones are appended in
    /// batch order; [`ParamUpdate::Delete`] removes every occurrence. When
    /// no parameters remain the query is dropped entirely.
    pub fn batch_update<'a, I>(&mut self, changes: I)
    where
        I: IntoIterator<Item = (&'a str, ParamUpdate)>,
    {
        let changes: Vec<(&str, Option<String>)> = changes
            .into_iter()
            .map(|(name, update)| {
                let value = match update {
                    ParamUpdate::Set(value) => Some(value),
                    ParamUpdate::SetList(items) => Some(items.join(",")),
                    ParamUpdate::Delete => None,
                };
                (name, value)
            })
            .collect();

        let mut consumed = vec![false; changes.len()];
        let mut out: Vec<String> = Vec::new();
        for pair in self.raw_query().split('&').filter(|p| !p.is_empty()) {
            let key = pair.split_once('=').map_or(pair, |(key, _)| key);
            match changes.iter().position(|(name, _)| *name == key) {
                Some(index) => {
                    // Later duplicates of an updated key are dropped.
                    if !consumed[index] {
                        consumed[index] = true;
                        if let Some(value) = &changes[index].1 {
                            out.push(format!("{key}={}", encode(value)));
                        }
                    }
                }
                None => out.push(pair.to_string()),
            }
        }
        for (index, (name, value)) in changes.iter().enumerate() {
            if consumed[index] {
                continue;
            }
            if let Some(value) = value {
                out.push(format!("{name}={}", encode(value)));
            }
        }

        if out.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&out.join("&")));
        }
    }

    fn raw_query(&self) -> &str {
        self.url.query().unwrap_or("")
    }

    fn raw_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw_query()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, VALUE_ESCAPES).to_string()
}
