/*!
 * Helpers shared by the sections for converting keyword data tokens into
 * typed fields and writing them back.
 */

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::errors::FieldError;
use crate::lexer::{Token, ESCAPE};
use crate::timecode::TcfToken;

/// Longest string an ADL field may hold
pub const MAX_STRING_LENGTH: usize = 255;

/// Text written for an unset optional field
pub const PLACEHOLDER: &str = "_";

/// A contiguous range of channels, written `3` or `1~4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelRange {
    begin: u32,
    end: u32,
}

impl ChannelRange {
    pub fn new(begin: u32, end: u32) -> Option<Self> {
        (begin >= 1 && begin <= end).then_some(Self { begin, end })
    }

    pub fn single(channel: u32) -> Option<Self> {
        Self::new(channel, channel)
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.split_once('~') {
            Some((begin, end)) => Self::new(begin.parse().ok()?, end.parse().ok()?),
            None => Self::single(text.parse().ok()?),
        }
    }

    pub fn begin(&self) -> u32 {
        self.begin
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn channels(&self) -> RangeInclusive<u32> {
        self.begin..=self.end
    }

    pub fn contains(&self, channel: u32) -> bool {
        self.channels().contains(&channel)
    }

    pub fn overlaps(&self, other: &ChannelRange) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}~{}", self.begin, self.end)
        }
    }
}

/// Fail unless at least `count` data tokens are present
pub fn require<'a>(keyword: &str, data: &'a [Token], count: usize) -> Result<&'a [Token], FieldError> {
    if data.len() < count {
        return Err(FieldError::MissingData {
            keyword: keyword.to_string(),
            expected: count,
            found: data.len(),
        });
    }
    Ok(data)
}

/// Fail when more than `count` data tokens are present
pub fn at_most(keyword: &str, data: &[Token], count: usize) -> Result<(), FieldError> {
    if data.len() > count {
        return Err(FieldError::ExtraData {
            keyword: keyword.to_string(),
            expected: count,
            found: data.len(),
        });
    }
    Ok(())
}

pub fn string(keyword: &str, token: &Token) -> Result<String, FieldError> {
    if token.text.chars().count() > MAX_STRING_LENGTH {
        return Err(FieldError::invalid(
            keyword,
            &token.text,
            format!("longer than {} characters", MAX_STRING_LENGTH),
        ));
    }
    Ok(token.text.clone())
}

pub fn optional_string(keyword: &str, token: &Token) -> Result<Option<String>, FieldError> {
    if token.is_placeholder() {
        return Ok(None);
    }
    string(keyword, token).map(Some)
}

pub fn number<T: FromStr>(keyword: &str, token: &Token) -> Result<T, FieldError> {
    token
        .text
        .parse()
        .map_err(|_| FieldError::invalid(keyword, &token.text, "not a valid number"))
}

/// A decimal kept as written so that output matches input
pub fn decimal(keyword: &str, token: &Token) -> Result<String, FieldError> {
    token
        .text
        .parse::<f64>()
        .map(|_| token.text.clone())
        .map_err(|_| FieldError::invalid(keyword, &token.text, "not a decimal value"))
}

pub fn timecode(keyword: &str, token: &Token) -> Result<TcfToken, FieldError> {
    TcfToken::parse(&token.text).map_err(|e| FieldError::timecode(keyword, e))
}

pub fn optional_timecode(keyword: &str, token: &Token) -> Result<Option<TcfToken>, FieldError> {
    if token.is_placeholder() {
        return Ok(None);
    }
    timecode(keyword, token).map(Some)
}

pub fn channels(keyword: &str, token: &Token) -> Result<ChannelRange, FieldError> {
    ChannelRange::parse(&token.text)
        .ok_or_else(|| FieldError::invalid(keyword, &token.text, "not a channel or channel range"))
}

/// Quote a string, escaping embedded quotes
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out.push('"');
    out
}

pub fn quote_optional(text: Option<&str>) -> String {
    text.map_or_else(|| PLACEHOLDER.to_string(), quote)
}

pub fn optional<T: fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}
