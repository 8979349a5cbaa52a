//! Identifier tokens for catalog colors and color groups.
//!
//! A serialized state parameter mixes two kinds of identifiers: bare color
//! ids (`1747`, `bright-2527`) and group tokens standing in for every color
//! in a family or branded category (`family:Red`, `category:Classics`).
//! The two are distinguished syntactically by the presence of a colon.
//!
//! This module owns the parse/format boundary. Everything past it operates
//! on the typed variants, never on raw strings with prefix-sniffing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Prefix marking a color from the bright line.
pub const BRIGHT_PREFIX: &str = "bright-";

/// Errors raised while parsing or constructing identifier tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid color id '{0}': expected digits with an optional 'bright-' prefix")]
    InvalidColorId(String),

    #[error("invalid group token '{0}': expected 'family:<name>' or 'category:<name>'")]
    InvalidGroupToken(String),

    #[error("group name '{0}' contains a reserved delimiter (':' or ',')")]
    ReservedDelimiter(String),
}

/// A single color identifier: the numeric value plus the bright-line flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId {
    pub number: u32,
    pub bright: bool,
}

impl ColorId {
    /// A regular (non-bright) id.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            bright: false,
        }
    }

    /// A bright-line id, rendered with the `bright-` prefix.
    pub fn bright(number: u32) -> Self {
        Self {
            number,
            bright: true,
        }
    }
}

impl FromStr for ColorId {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, TokenError> {
        let (digits, bright) = match s.strip_prefix(BRIGHT_PREFIX) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TokenError::InvalidColorId(s.to_string()));
        }
        let number = digits
            .parse::<u32>()
            .map_err(|_| TokenError::InvalidColorId(s.to_string()))?;
        Ok(Self { number, bright })
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bright {
            write!(f, "{}{}", BRIGHT_PREFIX, self.number)
        } else {
            write!(f, "{}", self.number)
        }
    }
}

/// Which grouping axis a group token addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Family,
    Category,
}

impl GroupKind {
    /// The serialized prefix (`family` or `category`).
    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Family => "family",
            GroupKind::Category => "category",
        }
    }
}

/// A token standing in for every current member of a family or category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupToken {
    pub kind: GroupKind,
    pub name: String,
}

impl GroupToken {
    /// Builds a group token, rejecting names that would corrupt the
    /// serialized form. Group tokens are comma-joined and colon-split, so
    /// names must contain neither delimiter.
    pub fn new(kind: GroupKind, name: impl Into<String>) -> Result<Self, TokenError> {
        let name = name.into();
        if name.contains(':') || name.contains(',') {
            return Err(TokenError::ReservedDelimiter(name));
        }
        Ok(Self { kind, name })
    }

    /// Shorthand for a `family:<name>` token.
    pub fn family(name: impl Into<String>) -> Result<Self, TokenError> {
        Self::new(GroupKind::Family, name)
    }

    /// Shorthand for a `category:<name>` token.
    pub fn category(name: impl Into<String>) -> Result<Self, TokenError> {
        Self::new(GroupKind::Category, name)
    }
}

impl fmt::Display for GroupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.label(), self.name)
    }
}

/// Either a bare color id or a group token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentifierToken {
    Color(ColorId),
    Group(GroupToken),
}

impl IdentifierToken {
    pub fn as_color(&self) -> Option<ColorId> {
        match self {
            IdentifierToken::Color(id) => Some(*id),
            IdentifierToken::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupToken> {
        match self {
            IdentifierToken::Color(_) => None,
            IdentifierToken::Group(group) => Some(group),
        }
    }
}

impl From<ColorId> for IdentifierToken {
    fn from(id: ColorId) -> Self {
        IdentifierToken::Color(id)
    }
}

impl From<GroupToken> for IdentifierToken {
    fn from(group: GroupToken) -> Self {
        IdentifierToken::Group(group)
    }
}

impl FromStr for IdentifierToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, TokenError> {
        match s.split_once(':') {
            Some((kind, name)) => {
                let kind = match kind {
                    "family" => GroupKind::Family,
                    "category" => GroupKind::Category,
                    _ => return Err(TokenError::InvalidGroupToken(s.to_string())),
                };
                Ok(IdentifierToken::Group(GroupToken::new(kind, name)?))
            }
            None => Ok(IdentifierToken::Color(s.parse()?)),
        }
    }
}

impl fmt::Display for IdentifierToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierToken::Color(id) => id.fmt(f),
            IdentifierToken::Group(group) => group.fmt(f),
        }
    }
}
