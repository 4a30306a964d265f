use std::fmt;

use crate::errors::FieldError;
use crate::fields::{self, ChannelRange};
use crate::lexer::Token;
use crate::timecode::{SampleRate, TcfToken};

const FADE_KEYWORDS: [&str; 3] = ["Infade", "Outfade", "Xfade"];
const OTHER_KEYWORDS: [&str; 3] = ["Alt", "Gain", "Rem"];

/// Shape of a fade curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeShape {
    Linear,
    Curve,
}

impl FadeShape {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_uppercase().as_str() {
            "LIN" => Some(Self::Linear),
            "CURVE" => Some(Self::Curve),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "LIN",
            Self::Curve => "CURVE",
        }
    }
}

/// Source a cross-fade fades from
#[derive(Debug, Clone, PartialEq)]
pub struct FadeSource {
    pub source_type: String,
    pub source_index: u32,
    pub source_in: TcfToken,
}

/// An in-fade, out-fade or cross-fade
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    pub shape: FadeShape,
    // @field: Curve parameters a, b and c as written
    pub curve: [Option<String>; 3],
    pub duration: Option<TcfToken>,
    pub source: Option<FadeSource>,
}

impl Fade {
    pub fn linear(duration: TcfToken) -> Self {
        Self {
            shape: FadeShape::Linear,
            curve: [None, None, None],
            duration: Some(duration),
            source: None,
        }
    }

    fn from_data(keyword: &str, data: &[Token]) -> Result<Self, FieldError> {
        let data = fields::require(keyword, data, 5)?;
        let shape = FadeShape::parse(&data[0].text)
            .ok_or_else(|| FieldError::invalid(keyword, &data[0].text, "fade shape must be LIN or CURVE"))?;
        let mut curve: [Option<String>; 3] = [None, None, None];
        for (slot, token) in curve.iter_mut().zip(&data[1..4]) {
            if !token.is_placeholder() {
                *slot = Some(fields::decimal(keyword, token)?);
            }
        }
        // the fade source is all or nothing
        let source = if data.len() == 5 {
            None
        } else {
            let data = fields::require(keyword, data, 8)?;
            if data[5].is_placeholder() {
                None
            } else {
                Some(FadeSource {
                    source_type: fields::string(keyword, &data[5])?,
                    source_index: fields::number(keyword, &data[6])?,
                    source_in: fields::timecode(keyword, &data[7])?,
                })
            }
        };
        Ok(Self {
            shape,
            curve,
            duration: fields::optional_timecode(keyword, &data[4])?,
            source,
        })
    }

    fn resample(&mut self, rate: SampleRate) {
        self.duration = self.duration.map(|tc| tc.resample(rate));
        if let Some(source) = &mut self.source {
            source.source_in = source.source_in.resample(rate);
        }
    }
}

impl fmt::Display for Fade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.shape.as_str())?;
        for value in &self.curve {
            write!(f, " {}", fields::optional(value.as_ref()))?;
        }
        write!(f, " {}", fields::optional(self.duration.as_ref()))?;
        if let Some(source) = &self.source {
            write!(f, " {} {:04} {}", source.source_type, source.source_index, source.source_in)?;
        }
        Ok(())
    }
}

/// Alternate source material for a cut
#[derive(Debug, Clone, PartialEq)]
pub struct AlternateSource {
    pub source_type: String,
    pub source_index: u32,
    pub source_channels: ChannelRange,
    pub source_in: TcfToken,
}

/// Gain change, optionally at a position within the cut
#[derive(Debug, Clone, PartialEq)]
pub struct Gain {
    pub position: Option<TcfToken>,
    // @field: Level in dB as written
    pub level: String,
}

/// Free text remark, e.g. `(Rem) NAME "Take 2"`
#[derive(Debug, Clone, PartialEq)]
pub struct Remark {
    pub kind: String,
    pub text: String,
}

/// Modifiers attached to a cut entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modifiers {
    pub in_fade: Option<Fade>,
    pub out_fade: Option<Fade>,
    pub cross_fade: Option<Fade>,
    pub alternates: Vec<AlternateSource>,
    pub gains: Vec<Gain>,
    pub remarks: Vec<Remark>,
}

impl Modifiers {
    pub fn is_modifier_keyword(keyword: &str) -> bool {
        FADE_KEYWORDS
            .iter()
            .chain(OTHER_KEYWORDS.iter())
            .any(|k| k.eq_ignore_ascii_case(keyword))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Store a modifier. Trailing extra data is reported after the
    /// modifier itself has been kept.
    pub fn add(&mut self, keyword: &str, data: &[Token]) -> Result<(), FieldError> {
        let name = keyword.to_ascii_uppercase();
        let limit = match name.as_str() {
            "INFADE" | "OUTFADE" | "XFADE" => 8,
            "ALT" => 4,
            _ => 2,
        };
        match name.as_str() {
            "INFADE" => self.in_fade = Some(Fade::from_data(keyword, data)?),
            "OUTFADE" => self.out_fade = Some(Fade::from_data(keyword, data)?),
            "XFADE" => self.cross_fade = Some(Fade::from_data(keyword, data)?),
            "ALT" => {
                let data = fields::require(keyword, data, 4)?;
                self.alternates.push(AlternateSource {
                    source_type: fields::string(keyword, &data[0])?,
                    source_index: fields::number(keyword, &data[1])?,
                    source_channels: fields::channels(keyword, &data[2])?,
                    source_in: fields::timecode(keyword, &data[3])?,
                });
            }
            "GAIN" => {
                let data = fields::require(keyword, data, 2)?;
                self.gains.push(Gain {
                    position: fields::optional_timecode(keyword, &data[0])?,
                    level: fields::decimal(keyword, &data[1])?,
                });
            }
            "REM" => {
                let data = fields::require(keyword, data, 2)?;
                self.remarks.push(Remark {
                    kind: fields::string(keyword, &data[0])?,
                    text: fields::string(keyword, &data[1])?,
                });
            }
            _ => {
                return Err(FieldError::UnknownKeyword {
                    keyword: keyword.to_string(),
                    section: "EVENT_LIST".to_string(),
                });
            }
        }
        fields::at_most(keyword, data, limit)
    }

    /// Sources referenced by the fades
    pub fn fade_sources(&self) -> impl Iterator<Item = &FadeSource> {
        [&self.in_fade, &self.out_fade, &self.cross_fade]
            .into_iter()
            .filter_map(|fade| fade.as_ref().and_then(|f| f.source.as_ref()))
    }

    pub fn resample(&mut self, rate: SampleRate) {
        for fade in [&mut self.in_fade, &mut self.out_fade, &mut self.cross_fade].into_iter().flatten() {
            fade.resample(rate);
        }
        for alternate in &mut self.alternates {
            alternate.source_in = alternate.source_in.resample(rate);
        }
        for gain in &mut self.gains {
            gain.position = gain.position.map(|tc| tc.resample(rate));
        }
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fades = [
            (FADE_KEYWORDS[0], &self.in_fade),
            (FADE_KEYWORDS[1], &self.out_fade),
            (FADE_KEYWORDS[2], &self.cross_fade),
        ];
        for (keyword, fade) in fades {
            if let Some(fade) = fade {
                write!(f, "\n\t({})\t{}", keyword, fade)?;
            }
        }
        for alt in &self.alternates {
            write!(
                f,
                "\n\t(Alt)\t{} {:04} {} {}",
                alt.source_type, alt.source_index, alt.source_channels, alt.source_in
            )?;
        }
        for gain in &self.gains {
            write!(f, "\n\t(Gain)\t{} {}", fields::optional(gain.position.as_ref()), gain.level)?;
        }
        for remark in &self.remarks {
            write!(f, "\n\t(Rem)\t{} {}", remark.kind, fields::quote(&remark.text))?;
        }
        Ok(())
    }
}
