use std::collections::BTreeMap;
use std::fmt;

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::{unknown_keyword, Section, SectionHeader};

/// A source file referenced by cut entries through its index number
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub index: u32,
    pub url: String,
    pub umid: Option<String>,
    /// Time stamp of the first sample in the file
    pub start: Option<TcfToken>,
    pub length: Option<TcfToken>,
    pub name: Option<String>,
    // @field: Unrecognized trailing fields, written back as read
    pub extra: Vec<String>,
}

impl SourceEntry {
    pub fn new(index: u32, url: &str) -> Self {
        Self {
            index,
            url: url.to_string(),
            umid: None,
            start: None,
            length: None,
            name: None,
            extra: Vec::new(),
        }
    }

    fn from_data(index: u32, keyword: &str, data: &[Token]) -> Result<Self, FieldError> {
        let data = fields::require(keyword, data, 5)?;
        Ok(Self {
            index,
            url: fields::string(keyword, &data[0])?,
            umid: fields::optional_string(keyword, &data[1])?,
            start: fields::optional_timecode(keyword, &data[2])?,
            length: fields::optional_timecode(keyword, &data[3])?,
            name: fields::optional_string(keyword, &data[4])?,
            extra: data[5..].iter().map(|t| t.text.clone()).collect(),
        })
    }

    fn resample(&mut self, rate: SampleRate) {
        self.start = self.start.map(|tc| tc.resample(rate));
        self.length = self.length.map(|tc| tc.resample(rate));
    }
}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04} (F) {} {} {} {} {}",
            self.index,
            fields::quote(&self.url),
            fields::optional(self.umid.as_ref()),
            fields::optional(self.start.as_ref()),
            fields::optional(self.length.as_ref()),
            fields::quote_optional(self.name.as_deref())
        )?;
        for extra in &self.extra {
            write!(f, " {}", extra)?;
        }
        Ok(())
    }
}

/// The `<SOURCE_INDEX>` section: files referenced by the edit events
#[derive(Debug, Clone, PartialEq)]
pub struct SourceIndexSection {
    header: SectionHeader,
    entries: BTreeMap<u32, SourceEntry>,
    // @field: Index number announced by the last (Index) keyword
    pending_index: Option<u32>,
}

impl SourceIndexSection {
    pub const TAG: &'static str = "SOURCE_INDEX";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            entries: BTreeMap::new(),
            pending_index: None,
        }
    }

    pub fn entry(&self, index: u32) -> Option<&SourceEntry> {
        self.entries.get(&index)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.values()
    }

    /// Add an entry, replacing any entry with the same index
    pub fn insert(&mut self, entry: SourceEntry) -> Option<SourceEntry> {
        self.entries.insert(entry.index, entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SourceIndexSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for SourceIndexSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        match keyword.to_ascii_uppercase().as_str() {
            "INDEX" => {
                let data = fields::require(keyword, data, 1)?;
                self.pending_index = Some(fields::number(keyword, &data[0])?);
                Ok(())
            }
            "F" => {
                let index = self.pending_index.take().ok_or_else(|| FieldError::OutOfSequence {
                    keyword: keyword.to_string(),
                    expected: "Index".to_string(),
                })?;
                let entry = SourceEntry::from_data(index, keyword, data)?;
                if self.entries.insert(index, entry).is_some() {
                    return Err(FieldError::invalid(keyword, &index.to_string(), "source index listed twice"));
                }
                Ok(())
            }
            _ => Err(unknown_keyword(keyword, self.name())),
        }
    }

    fn resample(&mut self, rate: SampleRate) {
        for entry in self.entries.values_mut() {
            entry.resample(rate);
        }
    }
}

impl fmt::Display for SourceIndexSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for entry in self.entries.values() {
            write!(f, "\n\t(Index)\t{}", entry)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
