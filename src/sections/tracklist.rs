use std::collections::BTreeMap;
use std::fmt;

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use super::{unknown_keyword, write_field, Section, SectionHeader};

/// The `<TRACKLIST>` section: optional names for destination tracks
#[derive(Debug, Clone, PartialEq)]
pub struct TracklistSection {
    header: SectionHeader,
    tracks: BTreeMap<u32, Option<String>>,
}

impl TracklistSection {
    pub const TAG: &'static str = "TRACKLIST";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            tracks: BTreeMap::new(),
        }
    }

    /// Add or rename a track
    pub fn set_track(&mut self, number: u32, name: Option<&str>) {
        self.tracks.insert(number, name.map(str::to_string));
    }

    pub fn remove_track(&mut self, number: u32) -> bool {
        self.tracks.remove(&number).is_some()
    }

    pub fn track_name(&self, number: u32) -> Option<&str> {
        self.tracks.get(&number).and_then(|name| name.as_deref())
    }

    pub fn contains(&self, number: u32) -> bool {
        self.tracks.contains_key(&number)
    }

    pub fn track_numbers(&self) -> impl Iterator<Item = u32> + '_ {
        self.tracks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for TracklistSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for TracklistSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        if !keyword.eq_ignore_ascii_case("Track") {
            return Err(unknown_keyword(keyword, self.name()));
        }
        let data = fields::require(keyword, data, 1)?;
        let number: u32 = fields::number(keyword, &data[0])?;
        let name = match data.get(1) {
            Some(token) => fields::optional_string(keyword, token)?,
            None => None,
        };
        if self.tracks.contains_key(&number) {
            self.tracks.insert(number, name);
            return Err(FieldError::invalid(keyword, &data[0].text, "track listed twice"));
        }
        self.tracks.insert(number, name);
        Ok(())
    }
}

impl fmt::Display for TracklistSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for (number, name) in &self.tracks {
            write_field(f, "Track", format_args!("{} {}", number, fields::quote_optional(name.as_deref())))?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
