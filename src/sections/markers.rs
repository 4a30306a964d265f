use std::cmp::Ordering;
use std::fmt;

use crate::errors::FieldError;
use crate::fields::{self, ChannelRange};
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::{unknown_keyword, write_field, Section, SectionHeader};

/// Kind of a marker, one per marker keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Simple,
    PqStart,
    PqEnd,
    PqIndex,
}

impl MarkerKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Simple => "MK",
            Self::PqStart => "MK-PQ-START",
            Self::PqEnd => "MK-PQ-END",
            Self::PqIndex => "MK-PQ-INDEX",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        [Self::Simple, Self::PqStart, Self::PqEnd, Self::PqIndex]
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(keyword))
    }

    // name tag used by Nuendo cue points
    fn cue_tag(self) -> Option<&'static str> {
        match self {
            Self::Simple => None,
            Self::PqStart => Some("[t-start]"),
            Self::PqEnd => Some("[t-end]"),
            Self::PqIndex => Some("[t-index]"),
        }
    }
}

/// A marker on the destination timeline
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPoint {
    pub kind: MarkerKind,
    /// None when the marker applies to no particular channel
    pub destination: Option<ChannelRange>,
    pub dest_in: TcfToken,
    /// Only simple markers carry an out point
    pub dest_out: Option<TcfToken>,
    pub name: Option<String>,
}

impl MarkerPoint {
    pub fn new(kind: MarkerKind, dest_in: TcfToken, name: Option<&str>) -> Self {
        Self {
            kind,
            destination: None,
            dest_in,
            dest_out: None,
            name: name.map(str::to_string),
        }
    }

    fn from_data(kind: MarkerKind, keyword: &str, data: &[Token]) -> Result<Self, FieldError> {
        let data = fields::require(keyword, data, 4)?;
        let destination = if data[0].is_placeholder() {
            None
        } else {
            Some(fields::channels(keyword, &data[0])?)
        };
        let dest_out = match kind {
            MarkerKind::Simple => fields::optional_timecode(keyword, &data[2])?,
            _ => None,
        };
        Ok(Self {
            kind,
            destination,
            dest_in: fields::timecode(keyword, &data[1])?,
            dest_out,
            name: fields::optional_string(keyword, &data[3])?,
        })
    }

    // dest-in first, then name; markers without a name sort first
    fn order(&self, other: &Self) -> Ordering {
        self.dest_in.cmp(&other.dest_in).then_with(|| self.name.cmp(&other.name))
    }
}

impl fmt::Display for MarkerPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            fields::optional(self.destination.as_ref()),
            self.dest_in,
            fields::optional(self.dest_out.as_ref()),
            fields::quote_optional(self.name.as_deref())
        )
    }
}

/// The `<MARKER_LIST>` section, also accepted as `<MARK_LIST>`
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerListSection {
    header: SectionHeader,
    markers: Vec<MarkerPoint>,
}

impl MarkerListSection {
    pub const TAG: &'static str = "MARKER_LIST";
    pub const ALIAS: &'static str = "MARK_LIST";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            markers: Vec::new(),
        }
    }

    pub fn markers(&self) -> &[MarkerPoint] {
        &self.markers
    }

    pub fn add_marker(&mut self, marker: MarkerPoint) {
        self.markers.push(marker);
    }

    pub fn markers_of_kind(&self, kind: MarkerKind) -> impl Iterator<Item = &MarkerPoint> {
        self.markers.iter().filter(move |m| m.kind == kind)
    }

    /// Stable sort by destination-in, then name
    pub fn sort(&mut self) {
        self.markers.sort_by(MarkerPoint::order);
    }

    /// Turn Nuendo cue points into markers.
    ///
    /// A cue whose name carries a `[t-start]`, `[t-end]` or `[t-index]` tag
    /// becomes the matching PQ marker with the tag removed from the name;
    /// every other cue becomes a simple marker.
    pub fn import_cues(&mut self, cues: &NuendoCuelistSection) -> usize {
        for cue in cues.cues() {
            let (kind, name) = match &cue.name {
                Some(name) => {
                    let lower = name.to_ascii_lowercase();
                    let tagged = [MarkerKind::PqStart, MarkerKind::PqEnd, MarkerKind::PqIndex]
                        .into_iter()
                        .find_map(|kind| {
                            let tag = kind.cue_tag()?;
                            let at = lower.find(tag)?;
                            let mut stripped = name.clone();
                            stripped.replace_range(at..at + tag.len(), "");
                            Some((kind, stripped.trim().to_string()))
                        });
                    match tagged {
                        Some((kind, stripped)) => (kind, Some(stripped).filter(|s| !s.is_empty())),
                        None => (MarkerKind::Simple, Some(name.clone())),
                    }
                }
                None => (MarkerKind::Simple, None),
            };
            self.markers.push(MarkerPoint::new(kind, cue.dest_in, name.as_deref()));
        }
        cues.cues().len()
    }
}

impl Default for MarkerListSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for MarkerListSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let kind = MarkerKind::from_keyword(keyword).ok_or_else(|| unknown_keyword(keyword, self.name()))?;
        let marker = MarkerPoint::from_data(kind, keyword, data)?;
        self.markers.push(marker);
        Ok(())
    }

    fn resample(&mut self, rate: SampleRate) {
        for marker in &mut self.markers {
            marker.dest_in = marker.dest_in.resample(rate);
            marker.dest_out = marker.dest_out.map(|tc| tc.resample(rate));
        }
    }
}

impl fmt::Display for MarkerListSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for marker in &self.markers {
            write_field(f, marker.kind.keyword(), marker)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}

/// A cue point exported by Nuendo
#[derive(Debug, Clone, PartialEq)]
pub struct CuePoint {
    pub dest_in: TcfToken,
    pub name: Option<String>,
}

/// The `<NUENDO_CUELIST>` section
#[derive(Debug, Clone, PartialEq)]
pub struct NuendoCuelistSection {
    header: SectionHeader,
    cues: Vec<CuePoint>,
}

impl NuendoCuelistSection {
    pub const TAG: &'static str = "NUENDO_CUELIST";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            cues: Vec::new(),
        }
    }

    pub fn cues(&self) -> &[CuePoint] {
        &self.cues
    }

    pub fn add_cue(&mut self, dest_in: TcfToken, name: Option<&str>) {
        self.cues.push(CuePoint { dest_in, name: name.map(str::to_string) });
    }
}

impl Default for NuendoCuelistSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for NuendoCuelistSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        if !keyword.eq_ignore_ascii_case("CUE") {
            return Err(unknown_keyword(keyword, self.name()));
        }
        let data = fields::require(keyword, data, 1)?;
        let dest_in = fields::timecode(keyword, &data[0])?;
        let name = match data.get(1) {
            Some(token) => fields::optional_string(keyword, token)?,
            None => None,
        };
        self.cues.push(CuePoint { dest_in, name });
        Ok(())
    }

    fn resample(&mut self, rate: SampleRate) {
        for cue in &mut self.cues {
            cue.dest_in = cue.dest_in.resample(rate);
        }
    }
}

impl fmt::Display for NuendoCuelistSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        for cue in &self.cues {
            write_field(f, "CUE", format_args!("{} {}", cue.dest_in, fields::quote_optional(cue.name.as_deref())))?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
