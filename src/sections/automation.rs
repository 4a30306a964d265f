use std::fmt;

use crate::errors::FieldError;
use crate::fields::{self, ChannelRange};
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::{unknown_keyword, write_field, Section, SectionHeader};

/// Which automation list a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutomationKind {
    Fader,
    Mute,
    Pan,
}

impl AutomationKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Fader => "FADER_LIST",
            Self::Mute => "MUTE_LIST",
            Self::Pan => "PAN_LIST",
        }
    }

    /// Point keywords of the list
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Fader => &["FP"],
            Self::Mute => &["ON", "OFF"],
            Self::Pan => &["PP"],
        }
    }

    fn has_value(self) -> bool {
        !matches!(self, Self::Mute)
    }
}

/// One automation point: a keyword applied to a channel at a position
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationPoint {
    pub keyword: &'static str,
    pub channels: ChannelRange,
    pub position: TcfToken,
    // @field: Level in dB or pan position, as written
    pub value: Option<String>,
}

impl fmt::Display for AutomationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.channels, self.position)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

/// A `<FADER_LIST>`, `<MUTE_LIST>` or `<PAN_LIST>` section
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationSection {
    header: SectionHeader,
    kind: AutomationKind,
    points: Vec<AutomationPoint>,
}

impl AutomationSection {
    pub fn new(kind: AutomationKind) -> Self {
        Self {
            header: SectionHeader::new(kind.tag()),
            kind,
            points: Vec::new(),
        }
    }

    pub fn kind(&self) -> AutomationKind {
        self.kind
    }

    pub fn points(&self) -> &[AutomationPoint] {
        &self.points
    }

    pub fn points_for_channel(&self, channel: u32) -> impl Iterator<Item = &AutomationPoint> {
        self.points.iter().filter(move |p| p.channels.contains(channel))
    }

    /// Stable sort by position
    pub fn sort(&mut self) {
        self.points.sort_by(|a, b| a.position.cmp(&b.position));
    }
}

impl Section for AutomationSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let canonical = self
            .kind
            .keywords()
            .iter()
            .copied()
            .find(|k| k.eq_ignore_ascii_case(keyword))
            .ok_or_else(|| unknown_keyword(keyword, self.name()))?;

        let expected = if self.kind.has_value() { 3 } else { 2 };
        let data = fields::require(keyword, data, expected)?;
        let value = if self.kind.has_value() {
            Some(fields::decimal(keyword, &data[2])?)
        } else {
            None
        };
        self.points.push(AutomationPoint {
            keyword: canonical,
            channels: fields::channels(keyword, &data[0])?,
            position: fields::timecode(keyword, &data[1])?,
            value,
        });
        Ok(())
    }

    fn resample(&mut self, rate: SampleRate) {
        for point in &mut self.points {
            point.position = point.position.resample(rate);
        }
    }
}

impl fmt::Display for AutomationSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for point in &self.points {
            write_field(f, point.keyword, point)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
