use std::fmt;

use crate::errors::FieldError;
use crate::fields::{self, ChannelRange};
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::modifiers::Modifiers;

/// Discriminant of an edit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Cut,
    Silence,
    Auxiliary,
    Video,
}

impl EntryType {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cut => "Cut",
            Self::Silence => "Silence",
            Self::Auxiliary => "Aux",
            Self::Video => "Vid",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::Cut, Self::Silence, Self::Auxiliary, Self::Video]
            .into_iter()
            .find(|t| t.keyword().eq_ignore_ascii_case(keyword))
    }
}

/// Source side of a cut
#[derive(Debug, Clone, PartialEq)]
pub struct CutSource {
    pub source_type: String,
    /// Index into the SOURCE_INDEX section
    pub source_index: u32,
    pub source_channels: ChannelRange,
    pub source_in: TcfToken,
    pub modifiers: Modifiers,
}

impl CutSource {
    pub fn new(source_index: u32, source_channels: ChannelRange, source_in: TcfToken) -> Self {
        Self {
            source_type: "I".to_string(),
            source_index,
            source_channels,
            source_in,
            modifiers: Modifiers::default(),
        }
    }
}

/// Source reference of a video entry
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSource {
    pub source_type: String,
    pub source_index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Cut(CutSource),
    Silence,
    Auxiliary,
    Video(VideoSource),
}

/// One `(Entry)` of the event list
#[derive(Debug, Clone, PartialEq)]
pub struct EditEntry {
    pub number: u32,
    pub destination: ChannelRange,
    pub dest_in: TcfToken,
    pub dest_out: TcfToken,
    pub status: Option<String>,
    pub kind: EntryKind,
}

impl EditEntry {
    pub fn new(
        number: u32,
        kind: EntryKind,
        destination: ChannelRange,
        dest_in: TcfToken,
        dest_out: TcfToken,
    ) -> Self {
        Self { number, destination, dest_in, dest_out, status: None, kind }
    }

    /// Number of data fields an entry type takes, status included
    pub fn data_field_count(entry_type: EntryType) -> usize {
        match entry_type {
            EntryType::Cut => 8,
            EntryType::Video => 6,
            EntryType::Silence | EntryType::Auxiliary => 4,
        }
    }

    /// Build an entry from the data following its type keyword
    pub fn from_data(number: u32, entry_type: EntryType, keyword: &str, data: &[Token]) -> Result<Self, FieldError> {
        // index of the destination channels; dest-in, dest-out and status follow it
        let (kind, dest_at) = match entry_type {
            EntryType::Cut => {
                let data = fields::require(keyword, data, 7)?;
                let source = CutSource {
                    source_type: fields::string(keyword, &data[0])?,
                    source_index: fields::number(keyword, &data[1])?,
                    source_channels: fields::channels(keyword, &data[2])?,
                    source_in: fields::timecode(keyword, &data[4])?,
                    modifiers: Modifiers::default(),
                };
                (EntryKind::Cut(source), 3)
            }
            EntryType::Video => {
                let data = fields::require(keyword, data, 5)?;
                let source = VideoSource {
                    source_type: fields::string(keyword, &data[0])?,
                    source_index: fields::number(keyword, &data[1])?,
                };
                (EntryKind::Video(source), 2)
            }
            EntryType::Silence => (EntryKind::Silence, 0),
            EntryType::Auxiliary => (EntryKind::Auxiliary, 0),
        };

        // cuts carry the source-in between destination channels and dest-in
        let times_at = if entry_type == EntryType::Cut { dest_at + 2 } else { dest_at + 1 };
        let data = fields::require(keyword, data, times_at + 2)?;
        let status = match data.get(times_at + 2) {
            Some(token) => fields::optional_string(keyword, token)?,
            None => None,
        };

        let entry = Self {
            number,
            destination: fields::channels(keyword, &data[dest_at])?,
            dest_in: fields::timecode(keyword, &data[times_at])?,
            dest_out: fields::timecode(keyword, &data[times_at + 1])?,
            status,
            kind,
        };
        if entry.dest_out < entry.dest_in {
            return Err(FieldError::invalid(
                keyword,
                &entry.dest_out.to_string(),
                "destination out lies before destination in",
            ));
        }
        Ok(entry)
    }

    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            EntryKind::Cut(_) => EntryType::Cut,
            EntryKind::Silence => EntryType::Silence,
            EntryKind::Auxiliary => EntryType::Auxiliary,
            EntryKind::Video(_) => EntryType::Video,
        }
    }

    pub fn is_cut(&self) -> bool {
        matches!(self.kind, EntryKind::Cut(_))
    }

    pub fn cut(&self) -> Option<&CutSource> {
        match &self.kind {
            EntryKind::Cut(source) => Some(source),
            _ => None,
        }
    }

    pub fn cut_mut(&mut self) -> Option<&mut CutSource> {
        match &mut self.kind {
            EntryKind::Cut(source) => Some(source),
            _ => None,
        }
    }

    /// First channel of the destination range, used for ordering
    pub fn primary_channel(&self) -> u32 {
        self.destination.begin()
    }

    /// Whether a sample position lies within `dest_in..=dest_out`
    pub fn covers(&self, position: u64) -> bool {
        self.dest_in.value_in_samples() <= position && position <= self.dest_out.value_in_samples()
    }

    pub fn length_in_samples(&self) -> u64 {
        self.dest_out
            .value_in_samples()
            .saturating_sub(self.dest_in.value_in_samples())
    }

    /// Whether the entry reads from a source index, directly or through a fade
    pub fn references_source(&self, index: u32) -> bool {
        self.cut().is_some_and(|cut| {
            cut.source_index == index || cut.modifiers.fade_sources().any(|s| s.source_index == index)
        })
    }

    pub fn resample(&mut self, rate: SampleRate) {
        self.dest_in = self.dest_in.resample(rate);
        self.dest_out = self.dest_out.resample(rate);
        if let Some(cut) = self.cut_mut() {
            cut.source_in = cut.source_in.resample(rate);
            cut.modifiers.resample(rate);
        }
    }
}

impl fmt::Display for EditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} ({}) ", self.number, self.entry_type().keyword())?;
        match &self.kind {
            EntryKind::Cut(cut) => write!(
                f,
                "{} {:04} {} {} {} ",
                cut.source_type, cut.source_index, cut.source_channels, self.destination, cut.source_in
            )?,
            EntryKind::Video(video) => write!(
                f,
                "{} {:04} {} ",
                video.source_type, video.source_index, self.destination
            )?,
            EntryKind::Silence | EntryKind::Auxiliary => write!(f, "{} ", self.destination)?,
        }
        write!(
            f,
            "{} {} {}",
            self.dest_in,
            self.dest_out,
            fields::optional(self.status.as_ref())
        )?;
        if let Some(cut) = self.cut() {
            write!(f, "{}", cut.modifiers)?;
        }
        Ok(())
    }
}
