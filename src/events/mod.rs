/*!
 * The `<EVENT_LIST>` section and its edit entries.
 *
 * The event list is the heart of an ADL: an ordered store of numbered
 * edit entries placing source material, silence, auxiliary or video
 * events on destination channels. Besides parsing, the store answers
 * channel and time range queries and can be re-sorted, which renumbers
 * the entries.
 *
 * - `entry`: `EditEntry` and its variants
 * - `modifiers`: fades, alternate sources, gains and remarks of cuts
 */

use std::collections::BTreeSet;
use std::fmt;

use log::debug;

use crate::errors::FieldError;
use crate::fields::{self, ChannelRange};
use crate::lexer::Token;
use crate::sections::{unknown_keyword, Section, SectionHeader};
use crate::timecode::SampleRate;

pub mod entry;
pub mod modifiers;

pub use entry::{CutSource, EditEntry, EntryKind, EntryType, VideoSource};
pub use modifiers::{AlternateSource, Fade, FadeShape, FadeSource, Gain, Modifiers, Remark};

/// The `<EVENT_LIST>` section
#[derive(Debug, Clone, PartialEq)]
pub struct EventListSection {
    header: SectionHeader,
    entries: Vec<EditEntry>,
    // @field: Number announced by the last (Entry) keyword
    pending_number: Option<u32>,
}

impl EventListSection {
    pub const TAG: &'static str = "EVENT_LIST";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            entries: Vec::new(),
            pending_number: None,
        }
    }

    pub fn entries(&self) -> &[EditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry; refused when its number is already taken
    pub fn add_entry(&mut self, entry: EditEntry) -> bool {
        if self.entry_numbered(entry.number).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn entry_numbered(&self, number: u32) -> Option<&EditEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    pub fn entry_numbered_mut(&mut self, number: u32) -> Option<&mut EditEntry> {
        self.entries.iter_mut().find(|e| e.number == number)
    }

    pub fn entries_of_type(&self, entry_type: EntryType) -> Vec<&EditEntry> {
        self.entries.iter().filter(|e| e.entry_type() == entry_type).collect()
    }

    /// Entries whose destination range contains `channel`
    pub fn entries_for_destination_channel(&self, channel: u32) -> Vec<&EditEntry> {
        self.entries.iter().filter(|e| e.destination.contains(channel)).collect()
    }

    pub fn entries_for_destination_channel_of_type(&self, channel: u32, entry_type: EntryType) -> Vec<&EditEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_type() == entry_type && e.destination.contains(channel))
            .collect()
    }

    /// Entries whose destination range shares a channel with `range`
    pub fn entries_overlapping_range(&self, range: &ChannelRange) -> Vec<&EditEntry> {
        self.entries.iter().filter(|e| e.destination.overlaps(range)).collect()
    }

    /// The cut on `channel` whose destination span contains `position`
    pub fn cut_entry_covering(&self, channel: u32, position: u64) -> Option<&EditEntry> {
        self.entries
            .iter()
            .find(|e| e.is_cut() && e.destination.contains(channel) && e.covers(position))
    }

    /// Cuts on `channel` starting in `[start, end)` or ending in `(start, end]`
    pub fn cuts_between(&self, channel: u32, start: u64, end: u64) -> Vec<&EditEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_cut() && e.destination.contains(channel))
            .filter(|e| {
                let dest_in = e.dest_in.value_in_samples();
                let dest_out = e.dest_out.value_in_samples();
                (dest_in >= start && dest_in < end) || (dest_out > start && dest_out <= end)
            })
            .collect()
    }

    /// Entries reading from a source index, directly or through a fade
    pub fn entries_for_source(&self, index: u32) -> Vec<&EditEntry> {
        self.entries.iter().filter(|e| e.references_source(index)).collect()
    }

    /// Every channel a cut writes to
    pub fn destination_channels(&self) -> BTreeSet<u32> {
        self.entries
            .iter()
            .filter(|e| e.is_cut())
            .flat_map(|e| e.destination.channels())
            .collect()
    }

    /// Seconds from the earliest destination-in to the latest destination-out
    pub fn duration_seconds(&self) -> Option<f64> {
        let first = self.entries.iter().map(|e| e.dest_in).min()?;
        let last = self.entries.iter().map(|e| e.dest_out).max()?;
        Some((last.as_seconds() - first.as_seconds()).max(0.0))
    }

    /// Stable sort by primary destination channel, then destination-in
    pub fn sort_by_channel_then_time(&mut self) {
        self.entries.sort_by(|a, b| {
            a.primary_channel()
                .cmp(&b.primary_channel())
                .then_with(|| a.dest_in.cmp(&b.dest_in))
        });
        self.renumber();
    }

    /// Stable sort by destination-in
    pub fn sort_by_time(&mut self) {
        self.entries.sort_by(|a, b| a.dest_in.cmp(&b.dest_in));
        self.renumber();
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.number = i as u32 + 1;
        }
        debug!("Renumbered {} event entries", self.entries.len());
    }
}

impl Default for EventListSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for EventListSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        if keyword.eq_ignore_ascii_case("Entry") {
            let data = fields::require(keyword, data, 1)?;
            self.pending_number = Some(fields::number(keyword, &data[0])?);
            return Ok(());
        }

        if let Some(entry_type) = EntryType::from_keyword(keyword) {
            let number = self.pending_number.take().ok_or_else(|| FieldError::OutOfSequence {
                keyword: keyword.to_string(),
                expected: "Entry".to_string(),
            })?;
            let entry = EditEntry::from_data(number, entry_type, keyword, data)?;
            let duplicate = self.entry_numbered(number).is_some();
            self.entries.push(entry);
            if duplicate {
                return Err(FieldError::invalid("Entry", &format!("{:04}", number), "entry number used twice"));
            }
            return fields::at_most(keyword, data, EditEntry::data_field_count(entry_type));
        }

        if Modifiers::is_modifier_keyword(keyword) {
            let cut = self
                .entries
                .last_mut()
                .and_then(EditEntry::cut_mut)
                .ok_or_else(|| FieldError::OutOfSequence {
                    keyword: keyword.to_string(),
                    expected: "Cut".to_string(),
                })?;
            return cut.modifiers.add(keyword, data);
        }

        Err(unknown_keyword(keyword, self.name()))
    }

    fn resample(&mut self, rate: SampleRate) {
        for entry in &mut self.entries {
            entry.resample(rate);
        }
    }
}

impl fmt::Display for EventListSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for entry in &self.entries {
            write!(f, "\n\t(Entry)\t{}", entry)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
