/*!
 * The ADL document.
 *
 * A `Document` owns every section of a parsed `<ADL>` in an arena. Node 0
 * is the `ADL` root; each top-level section is attached as its child and
 * keeps the root's handle as its parent. Lookups across sections, such as
 * finding the source file a cut reads from, go through the document.
 *
 * - `reader`: the section parsing protocol and the top-level loop
 * - `malformed`: keyword data found outside of any section
 */

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

use crate::app_config::ParserConfig;
use crate::errors::{AdlError, FieldError};
use crate::events::{EditEntry, EventListSection};
use crate::lexer::{Lexer, Token};
use crate::sections::{
    unknown_keyword, AutomationKind, AutomationSection, MarkerListSection, NuendoCuelistSection, ProjectSection,
    Section, SectionHeader, SequenceSection, SourceEntry, SourceIndexSection, SystemSection,
    TracklistSection, VersionSection,
};
use crate::timecode::SampleRate;

pub mod malformed;
pub mod reader;

pub use malformed::MalformedRecord;
pub use reader::read_section;

/// Tag of the document root
pub const ROOT_TAG: &str = "ADL";

/// The kinds of top-level section, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Version,
    Project,
    System,
    Sequence,
    Tracklist,
    SourceIndex,
    EventList,
    FaderList,
    MuteList,
    PanList,
    MarkerList,
    NuendoCuelist,
}

impl SectionKind {
    pub const ALL: [SectionKind; 12] = [
        Self::Version,
        Self::Project,
        Self::System,
        Self::Sequence,
        Self::Tracklist,
        Self::SourceIndex,
        Self::EventList,
        Self::FaderList,
        Self::MuteList,
        Self::PanList,
        Self::MarkerList,
        Self::NuendoCuelist,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Version => VersionSection::TAG,
            Self::Project => ProjectSection::TAG,
            Self::System => SystemSection::TAG,
            Self::Sequence => SequenceSection::TAG,
            Self::Tracklist => TracklistSection::TAG,
            Self::SourceIndex => SourceIndexSection::TAG,
            Self::EventList => EventListSection::TAG,
            Self::FaderList => AutomationKind::Fader.tag(),
            Self::MuteList => AutomationKind::Mute.tag(),
            Self::PanList => AutomationKind::Pan.tag(),
            Self::MarkerList => MarkerListSection::TAG,
            Self::NuendoCuelist => NuendoCuelistSection::TAG,
        }
    }

    /// Case-insensitive lookup, including the `MARK_LIST` spelling
    pub fn from_tag(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case(MarkerListSection::ALIAS) {
            return Some(Self::MarkerList);
        }
        Self::ALL.into_iter().find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }
}

/// Handle of a node in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(usize);

impl SectionId {
    pub const ROOT: SectionId = SectionId(0);
}

/// The `<ADL>` root. It holds no fields of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSection {
    header: SectionHeader,
}

impl Section for RootSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, _data: &[Token]) -> Result<(), FieldError> {
        Err(unknown_keyword(keyword, ROOT_TAG))
    }
}

impl fmt::Display for RootSection {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

/// Any section the arena can hold
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Root(RootSection),
    Version(VersionSection),
    Project(ProjectSection),
    System(SystemSection),
    Sequence(SequenceSection),
    Tracklist(TracklistSection),
    SourceIndex(SourceIndexSection),
    EventList(EventListSection),
    Automation(AutomationSection),
    MarkerList(MarkerListSection),
    NuendoCuelist(NuendoCuelistSection),
}

impl SectionBody {
    /// An empty section of the given kind
    pub fn new(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Version => Self::Version(VersionSection::new()),
            SectionKind::Project => Self::Project(ProjectSection::new()),
            SectionKind::System => Self::System(SystemSection::new()),
            SectionKind::Sequence => Self::Sequence(SequenceSection::new()),
            SectionKind::Tracklist => Self::Tracklist(TracklistSection::new()),
            SectionKind::SourceIndex => Self::SourceIndex(SourceIndexSection::new()),
            SectionKind::EventList => Self::EventList(EventListSection::new()),
            SectionKind::FaderList => Self::Automation(AutomationSection::new(AutomationKind::Fader)),
            SectionKind::MuteList => Self::Automation(AutomationSection::new(AutomationKind::Mute)),
            SectionKind::PanList => Self::Automation(AutomationSection::new(AutomationKind::Pan)),
            SectionKind::MarkerList => Self::MarkerList(MarkerListSection::new()),
            SectionKind::NuendoCuelist => Self::NuendoCuelist(NuendoCuelistSection::new()),
        }
    }

    /// None for the root
    pub fn kind(&self) -> Option<SectionKind> {
        let kind = match self {
            Self::Root(_) => return None,
            Self::Version(_) => SectionKind::Version,
            Self::Project(_) => SectionKind::Project,
            Self::System(_) => SectionKind::System,
            Self::Sequence(_) => SectionKind::Sequence,
            Self::Tracklist(_) => SectionKind::Tracklist,
            Self::SourceIndex(_) => SectionKind::SourceIndex,
            Self::EventList(_) => SectionKind::EventList,
            Self::Automation(a) => match a.kind() {
                AutomationKind::Fader => SectionKind::FaderList,
                AutomationKind::Mute => SectionKind::MuteList,
                AutomationKind::Pan => SectionKind::PanList,
            },
            Self::MarkerList(_) => SectionKind::MarkerList,
            Self::NuendoCuelist(_) => SectionKind::NuendoCuelist,
        };
        Some(kind)
    }

    pub fn as_section(&self) -> &dyn Section {
        match self {
            Self::Root(s) => s,
            Self::Version(s) => s,
            Self::Project(s) => s,
            Self::System(s) => s,
            Self::Sequence(s) => s,
            Self::Tracklist(s) => s,
            Self::SourceIndex(s) => s,
            Self::EventList(s) => s,
            Self::Automation(s) => s,
            Self::MarkerList(s) => s,
            Self::NuendoCuelist(s) => s,
        }
    }

    pub fn as_section_mut(&mut self) -> &mut dyn Section {
        match self {
            Self::Root(s) => s,
            Self::Version(s) => s,
            Self::Project(s) => s,
            Self::System(s) => s,
            Self::Sequence(s) => s,
            Self::Tracklist(s) => s,
            Self::SourceIndex(s) => s,
            Self::EventList(s) => s,
            Self::Automation(s) => s,
            Self::MarkerList(s) => s,
            Self::NuendoCuelist(s) => s,
        }
    }
}

impl fmt::Display for SectionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_section())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SectionNode {
    parent: Option<SectionId>,
    body: SectionBody,
}

/// A parsed ADL document.
///
/// Cloning a document copies every section; the copy shares nothing with
/// the original.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<SectionNode>,
    slots: BTreeMap<SectionKind, SectionId>,
    malformed: Vec<MalformedRecord>,
}

macro_rules! section_accessors {
    ($get:ident, $get_mut:ident, $kind:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Option<&$ty> {
            match self.section(SectionKind::$kind) {
                Some(SectionBody::$variant(s)) => Some(s),
                _ => None,
            }
        }

        pub fn $get_mut(&mut self) -> Option<&mut $ty> {
            match self.section_mut(SectionKind::$kind) {
                Some(SectionBody::$variant(s)) => Some(s),
                _ => None,
            }
        }
    };
}

impl Document {
    /// An empty document holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![SectionNode {
                parent: None,
                body: SectionBody::Root(RootSection { header: SectionHeader::new(ROOT_TAG) }),
            }],
            slots: BTreeMap::new(),
            malformed: Vec::new(),
        }
    }

    /// Parse document text with the default, tolerant parser settings
    pub fn parse(text: &str) -> Result<Self, AdlError> {
        Self::parse_with(text, &ParserConfig::default())
    }

    pub fn parse_with(text: &str, config: &ParserConfig) -> Result<Self, AdlError> {
        let mut lexer = Lexer::new(text);
        Self::read(&mut lexer, config)
    }

    pub fn read(lexer: &mut Lexer, config: &ParserConfig) -> Result<Self, AdlError> {
        reader::read_document(lexer, config)
    }

    pub fn root(&self) -> &SectionHeader {
        self.nodes[SectionId::ROOT.0].body.as_section().header()
    }

    pub(crate) fn root_mut(&mut self) -> &mut SectionHeader {
        self.nodes[SectionId::ROOT.0].body.as_section_mut().header_mut()
    }

    pub(crate) fn malformed_mut(&mut self) -> &mut Vec<MalformedRecord> {
        &mut self.malformed
    }

    pub fn section_id(&self, kind: SectionKind) -> Option<SectionId> {
        self.slots.get(&kind).copied()
    }

    pub fn get(&self, id: SectionId) -> Option<&SectionBody> {
        self.nodes.get(id.0).map(|node| &node.body)
    }

    pub fn parent_of(&self, id: SectionId) -> Option<SectionId> {
        self.nodes.get(id.0).and_then(|node| node.parent)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionBody> {
        let id = self.section_id(kind)?;
        self.get(id)
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> Option<&mut SectionBody> {
        let id = self.section_id(kind)?;
        self.nodes.get_mut(id.0).map(|node| &mut node.body)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.slots.contains_key(&kind)
    }

    /// Attach a section under the root, returning the one it replaces
    pub fn set_section(&mut self, body: SectionBody) -> Option<SectionBody> {
        let kind = body.kind()?;
        if let Some(id) = self.section_id(kind) {
            debug!("Replacing <{}> section", kind.tag());
            let node = &mut self.nodes[id.0];
            return Some(std::mem::replace(&mut node.body, body));
        }
        let id = SectionId(self.nodes.len());
        self.nodes.push(SectionNode { parent: Some(SectionId::ROOT), body });
        self.slots.insert(kind, id);
        None
    }

    /// Sections present, in output order
    pub fn sections(&self) -> impl Iterator<Item = &SectionBody> {
        self.slots.values().map(|id| &self.nodes[id.0].body)
    }

    section_accessors!(version, version_mut, Version, Version, VersionSection);
    section_accessors!(project, project_mut, Project, Project, ProjectSection);
    section_accessors!(system, system_mut, System, System, SystemSection);
    section_accessors!(sequence, sequence_mut, Sequence, Sequence, SequenceSection);
    section_accessors!(tracklist, tracklist_mut, Tracklist, Tracklist, TracklistSection);
    section_accessors!(source_index, source_index_mut, SourceIndex, SourceIndex, SourceIndexSection);
    section_accessors!(event_list, event_list_mut, EventList, EventList, EventListSection);
    section_accessors!(marker_list, marker_list_mut, MarkerList, MarkerList, MarkerListSection);
    section_accessors!(nuendo_cuelist, nuendo_cuelist_mut, NuendoCuelist, NuendoCuelist, NuendoCuelistSection);

    pub fn automation(&self, kind: AutomationKind) -> Option<&AutomationSection> {
        let slot = match kind {
            AutomationKind::Fader => SectionKind::FaderList,
            AutomationKind::Mute => SectionKind::MuteList,
            AutomationKind::Pan => SectionKind::PanList,
        };
        match self.section(slot) {
            Some(SectionBody::Automation(s)) => Some(s),
            _ => None,
        }
    }

    /// Keyword data found between sections
    pub fn malformed_records(&self) -> &[MalformedRecord] {
        &self.malformed
    }

    /// Validation messages of the root and every section
    pub fn error_count(&self) -> usize {
        self.nodes.iter().map(|node| node.body.as_section().error_count()).sum()
    }

    /// Every validation message, sections in output order, root last
    pub fn errors(&self) -> Vec<String> {
        self.sections()
            .chain(std::iter::once(&self.nodes[SectionId::ROOT.0].body))
            .flat_map(|body| body.as_section().header().errors().iter().cloned())
            .collect()
    }

    pub fn error_text(&self) -> String {
        self.errors().join("\n")
    }

    /// Convert every position in the document to another sample rate
    pub fn resample(&mut self, rate: SampleRate) {
        for node in &mut self.nodes {
            node.body.as_section_mut().resample(rate);
        }
    }

    /// The SOURCE_INDEX entry a cut reads from
    pub fn source_for_entry(&self, entry: &EditEntry) -> Option<&SourceEntry> {
        let cut = entry.cut()?;
        self.source_index()?.entry(cut.source_index)
    }

    /// Event entries reading from a source index, directly or through a fade
    pub fn entries_for_source(&self, index: u32) -> Vec<&EditEntry> {
        self.event_list()
            .map(|list| list.entries_for_source(index))
            .unwrap_or_default()
    }

    /// Copy the Nuendo cue points into the marker list, creating it if needed
    pub fn import_cues(&mut self) -> usize {
        let Some(cues) = self.nuendo_cuelist().cloned() else {
            return 0;
        };
        if !self.has_section(SectionKind::MarkerList) {
            self.set_section(SectionBody::new(SectionKind::MarkerList));
        }
        match self.marker_list_mut() {
            Some(markers) => markers.import_cues(&cues),
            None => {
                warn!("No marker list to import cues into");
                0
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", ROOT_TAG)?;
        for section in self.sections() {
            write!(f, "{}", section)?;
        }
        write!(f, "\n</{}>", ROOT_TAG)
    }
}
