//! Mixed-token payload compression.
//!
//! A favorites/hidden parameter holds an ordered list of identifier tokens.
//! The numeric subsequence is varint-packed and base85-encoded; the group
//! subsequence is comma-joined verbatim; a position mask of `n`/`g`
//! characters restores the original interleaving.
//!
//! Payload shapes:
//! - only numeric ids: `<base85>` (no dots)
//! - only group tokens: `.<group-list>`
//! - both: `<base85>.<group-list>.<mask>`
//! - no tokens at all: the empty string

use thiserror::Error;

use crate::codec::base85::{from_base85, to_base85, Base85Error};
use crate::codec::varint::{decode_ids, encode_ids, VarIntError};
use crate::token::{GroupToken, IdentifierToken, TokenError};

const REGION_SEPARATOR: char = '.';
const GROUP_SEPARATOR: char = ',';

const MASK_NUMERIC: char = 'n';
const MASK_GROUP: char = 'g';

/// Errors raised while compressing a token list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
    #[error(transparent)]
    VarInt(#[from] VarIntError),
}

/// Errors raised while decompressing a payload string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressError {
    #[error(transparent)]
    Base85(#[from] Base85Error),

    #[error(transparent)]
    VarInt(#[from] VarIntError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("payload has {0} regions, expected at most 3")]
    TooManyRegions(usize),

    #[error("position mask length {actual} does not match token count {expected}")]
    MaskLength { expected: usize, actual: usize },

    #[error("position mask contains '{0}', expected 'n' or 'g'")]
    MaskSymbol(char),

    #[error("position mask expects more '{symbol}' entries than the payload carries")]
    MaskMismatch { symbol: char },
}

/// Compresses an ordered token list into a payload string.
pub fn compress(tokens: &[IdentifierToken]) -> Result<String, CompressError> {
    if tokens.is_empty() {
        return Ok(String::new());
    }

    let mut ids = Vec::new();
    let mut groups = Vec::new();
    let mut mask = String::with_capacity(tokens.len());
    for token in tokens {
        match token {
            IdentifierToken::Color(id) => {
                ids.push(*id);
                mask.push(MASK_NUMERIC);
            }
            IdentifierToken::Group(group) => {
                groups.push(group.to_string());
                mask.push(MASK_GROUP);
            }
        }
    }

    let numeric = to_base85(&encode_ids(&ids)?);
    if groups.is_empty() {
        return Ok(numeric);
    }
    let group_list = groups.join(",");
    if ids.is_empty() {
        return Ok(format!(".{group_list}"));
    }
    Ok(format!("{numeric}.{group_list}.{mask}"))
}

/// Decompresses a payload string back into the original token list.
pub fn decompress(payload: &str) -> Result<Vec<IdentifierToken>, DecompressError> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    let regions: Vec<&str> = payload.split(REGION_SEPARATOR).collect();
    if regions.len() > 3 {
        return Err(DecompressError::TooManyRegions(regions.len()));
    }

    let ids = match regions[0] {
        "" => Vec::new(),
        numeric => decode_ids(&from_base85(numeric)?)?,
    };
    let groups: Vec<GroupToken> = match regions.get(1) {
        None => Vec::new(),
        Some(list) => list
            .split(GROUP_SEPARATOR)
            .filter(|entry| !entry.is_empty())
            .map(parse_group)
            .collect::<Result<_, _>>()?,
    };

    match regions.get(2) {
        None => Ok(ids
            .into_iter()
            .map(IdentifierToken::Color)
            .chain(groups.into_iter().map(IdentifierToken::Group))
            .collect()),
        Some(mask) => interleave(ids, groups, mask),
    }
}

fn parse_group(entry: &str) -> Result<GroupToken, DecompressError> {
    match entry.parse::<IdentifierToken>()? {
        IdentifierToken::Group(group) => Ok(group),
        IdentifierToken::Color(_) => Err(DecompressError::Token(TokenError::InvalidGroupToken(
            entry.to_string(),
        ))),
    }
}

/// Reconstructs the original token order from the position mask.
fn interleave(
    ids: Vec<crate::token::ColorId>,
    groups: Vec<GroupToken>,
    mask: &str,
) -> Result<Vec<IdentifierToken>, DecompressError> {
    let expected = ids.len() + groups.len();
    if mask.len() != expected {
        return Err(DecompressError::MaskLength {
            expected,
            actual: mask.len(),
        });
    }

    let mut ids = ids.into_iter();
    let mut groups = groups.into_iter();
    let mut out = Vec::with_capacity(expected);
    for symbol in mask.chars() {
        let token = match symbol {
            MASK_NUMERIC => ids.next().map(IdentifierToken::Color),
            MASK_GROUP => groups.next().map(IdentifierToken::Group),
            other => return Err(DecompressError::MaskSymbol(other)),
        };
        match token {
            Some(token) => out.push(token),
            None => return Err(DecompressError::MaskMismatch { symbol }),
        }
    }
    Ok(out)
}
