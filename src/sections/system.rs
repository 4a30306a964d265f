use std::fmt;

use crate::errors::FieldError;
use crate::fields;
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};
use super::{unknown_keyword, write_field, Section, SectionHeader};

/// Audio codec assumed when the document does not name one
pub const DEFAULT_AUDIO_CODEC: &str = "BWF";

/// The `<SYSTEM>` section: playback system parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSection {
    header: SectionHeader,
    pub source_offset: Option<TcfToken>,
    pub bit_depth: Option<u32>,
    audio_codec: Option<String>,
    /// Default crossfade length in samples
    pub crossfade_length: Option<u64>,
    // @field: Gain in dB, kept as written
    gain: Option<String>,
}

impl SystemSection {
    pub const TAG: &'static str = "SYSTEM";

    pub fn new() -> Self {
        Self {
            header: SectionHeader::new(Self::TAG),
            source_offset: None,
            bit_depth: None,
            audio_codec: None,
            crossfade_length: None,
            gain: None,
        }
    }

    pub fn audio_codec(&self) -> &str {
        self.audio_codec.as_deref().unwrap_or(DEFAULT_AUDIO_CODEC)
    }

    pub fn set_audio_codec(&mut self, codec: &str) {
        self.audio_codec = Some(codec.to_string());
    }

    pub fn gain(&self) -> Option<f64> {
        self.gain.as_deref().and_then(|g| g.parse().ok())
    }

    pub fn set_gain(&mut self, gain: f64) {
        self.gain = Some(format!("{:.2}", gain));
    }
}

impl Default for SystemSection {
    fn default() -> Self {
        Self::new()
    }
}

impl Section for SystemSection {
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
            "SYS_SRC_OFFSET" => self.source_offset = fields::optional_timecode(keyword, value)?,
            "SYS_BIT_DEPTH" => self.bit_depth = Some(fields::number(keyword, value)?),
            "SYS_AUD_CODEC" => self.audio_codec = fields::optional_string(keyword, value)?,
            "SYS_GAIN" => self.gain = Some(fields::decimal(keyword, value)?),
            "SYS_XFADE_LEN" => {
                if let Ok(samples) = value.text.parse::<u64>() {
                    self.crossfade_length = Some(samples);
                } else {
                    // accepted, but reported
                    let tc = fields::timecode(keyword, value)?;
                    self.crossfade_length = Some(tc.value_in_samples());
                    return Err(FieldError::invalid(
                        keyword,
                        &value.text,
                        "given as tcf value, should be integer sample count",
                    ));
                }
            }
            _ => return Err(unknown_keyword(keyword, self.name())),
        }
        Ok(())
    }

    fn resample(&mut self, rate: SampleRate) {
        self.source_offset = self.source_offset.map(|tc| tc.resample(rate));
    }
}

impl fmt::Display for SystemSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n<{}>", self.header.tag())?;
        if let Some(offset) = &self.source_offset {
            write_field(f, "SYS_SRC_OFFSET", offset)?;
        }
        if let Some(depth) = self.bit_depth {
            write_field(f, "SYS_BIT_DEPTH", depth)?;
        }
        if let Some(codec) = &self.audio_codec {
            write_field(f, "SYS_AUD_CODEC", fields::quote(codec))?;
        }
        if let Some(length) = self.crossfade_length {
            write_field(f, "SYS_XFADE_LEN", length)?;
        }
        if let Some(gain) = &self.gain {
            write_field(f, "SYS_GAIN", gain)?;
        }
        write!(f, "\n</{}>", self.header.tag())
    }
}
