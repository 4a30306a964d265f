use std::fmt;

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::{unknown_keyword, write_field, Section, SectionHeader};

/// Values allowed for `SEQ_FRAME_RATE`
pub const FRAME_RATES: [&str; 5] = ["23.976", "24", "25", "29.97", "30"];

/// The `<SEQUENCE>` section: sample rate, frame rate and start position
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSection {
    header: SectionHeader,
    pub sample_rate: Option<SampleRate>,
    frame_rate: Option<String>,
    pub adl_level: Option<u32>,
    pub sample_rate_factor: Option<u32>,
    pub dest_start: Option<TcfToken>,
}

impl SequenceSection {
    pub const TAG: &'static str = "SEQUENCE";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            sample_rate: None,
            frame_rate: None,
            adl_level: None,
            sample_rate_factor: None,
            dest_start: None,
        }
    }

    pub fn frame_rate(&self) -> Option<&str> {
        self.frame_rate.as_deref()
    }

    pub fn set_frame_rate(&mut self, rate: &str) -> bool {
        if !FRAME_RATES.contains(&rate) {
            return false;
        }
        self.frame_rate = Some(rate.to_string());
        true
    }
}

impl Default for SequenceSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for SequenceSection {
    fn header(&self) -> &SectionHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut SectionHeader {
        &mut self.header
    }

    fn add_data(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let data = fields::require(keyword, data, 1)?;
        let value = &data[0];
        match keyword.to_ascii_uppercase().as_str() {
            "SEQ_SAMPLE_RATE" => {
                let rate = SampleRate::from_name(&value.text)
                    .ok_or_else(|| FieldError::invalid(keyword, &value.text, "unknown sample rate"))?;
                self.sample_rate = Some(rate);
            }
            "SEQ_FRAME_RATE" => {
                if !self.set_frame_rate(&value.text) {
                    return Err(FieldError::invalid(keyword, &value.text, "not an AES31 frame rate"));
                }
            }
            "SEQ_ADL_LEVEL" => self.adl_level = Some(fields::number(keyword, value)?),
            "SEQ_SAMPLE_RATE_FACTOR" => self.sample_rate_factor = Some(fields::number(keyword, value)?),
            "SEQ_DEST_START" => self.dest_start = fields::optional_timecode(keyword, value)?,
            _ => return Err(unknown_keyword(keyword, self.name())),
        }
        Ok(())
    }

    fn resample(&mut self, rate: SampleRate) {
        self.sample_rate = Some(rate);
        self.dest_start = self.dest_start.map(|tc| tc.resample(rate));
    }
}

impl fmt::Display for SequenceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        if let Some(rate) = self.sample_rate {
            write_field(f, "SEQ_SAMPLE_RATE", rate)?;
        }
        if let Some(rate) = &self.frame_rate {
            write_field(f, "SEQ_FRAME_RATE", rate)?;
        }
        if let Some(level) = self.adl_level {
            write_field(f, "SEQ_ADL_LEVEL", level)?;
        }
        if let Some(factor) = self.sample_rate_factor {
            write_field(f, "SEQ_SAMPLE_RATE_FACTOR", factor)?;
        }
        if let Some(start) = &self.dest_start {
            write_field(f, "SEQ_DEST_START", start)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
