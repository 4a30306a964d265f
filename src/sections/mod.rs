/*!
 * ADL document sections.
 *
 * Every `<SECTION>` of a document is a field holder implementing the
 * `Section` trait: the parser feeds it `(KEYWORD) data...` groups through
 * `add_data`, and its `Display` implementation writes the section back in
 * ADL text form.
 *
 * - `version`: VERSION
 * - `project`: PROJECT
 * - `system`: SYSTEM
 * - `sequence`: SEQUENCE
 * - `tracklist`: TRACKLIST
 * - `source_index`: SOURCE_INDEX
 * - `markers`: MARKER_LIST and NUENDO_CUELIST
 * - `automation`: FADER_LIST, MUTE_LIST and PAN_LIST
 *
 * The EVENT_LIST lives in the `events` module.
 */

use std::fmt;

use log::debug;

use crate::errors::FieldError;
use crate::lexer::Token;
use crate::timecode::SampleRate;

pub mod automation;
pub mod markers;
pub mod project;
pub mod sequence;
pub mod source_index;
pub mod system;
pub mod tracklist;
pub mod version;

pub use automation::{AutomationKind, AutomationPoint, AutomationSection};
pub use markers::{CuePoint, MarkerKind, MarkerListSection, MarkerPoint, NuendoCuelistSection};
pub use project::ProjectSection;
pub use sequence::SequenceSection;
pub use source_index::{SourceEntry, SourceIndexSection};
pub use system::SystemSection;
pub use tracklist::TracklistSection;
pub use version::VersionSection;

/// Where a section is in its `<TAG>` ... `</TAG>` lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagState {
    Unopened,
    Open,
    Closed,
}

/// State shared by every section: its tag, tag state and validation messages
#[derive(Debug, Clone, PartialEq)]
pub struct SectionHeader {
    tag: String,
    state: TagState,
    errors: Vec<String>,
}

impl SectionHeader {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            state: TagState::Unopened,
            errors: Vec::new(),
        }
    }

    /// Tag name as written in the document
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    pub fn state(&self) -> TagState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == TagState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == TagState::Closed
    }

    pub fn open(&mut self) {
        if self.state == TagState::Unopened {
            self.state = TagState::Open;
        }
    }

    /// Close the tag; records an error when it was never opened
    pub fn close(&mut self) {
        if self.state == TagState::Unopened {
            self.add_error(format!("Close of <{}> tag encountered before open tag", self.tag));
        }
        self.state = TagState::Closed;
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{}: {}", self.tag, message);
        self.errors.push(message);
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// A field holder filled from keyword data
pub trait Section: fmt::Display {
    fn header(&self) -> &SectionHeader;

    fn header_mut(&mut self) -> &mut SectionHeader;

    /// Assign the data of one `(KEYWORD)` group to the section's fields
    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError>;

    /// Convert every position held by the section to another sample rate
    fn resample(&mut self, _rate: SampleRate) {}

    fn name(&self) -> &str {
        self.header().tag()
    }

    fn error_count(&self) -> usize {
        self.header().error_count()
    }
}

pub(crate) fn unknown_keyword(keyword: &str, section: &str) -> FieldError {
    FieldError::UnknownKeyword {
        keyword: keyword.to_string(),
        section: section.to_string(),
    }
}

// One `(KEYWORD)\tvalue` line
pub(crate) fn write_field(f: &mut fmt::Formatter<'_>, keyword: &str, value: impl fmt::Display) -> fmt::Result {
    write!(f, "\n\t({})\t{}", keyword, value)
}
