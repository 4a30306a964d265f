use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimecodeError;
use super::tables::{is_film_framing_indicator, FrameCount, FrameFormat, SampleRate, VideoField};

// Structural pattern of the 11 and 16 character forms
static TCF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{2})(.)([0-9]{2})(.)([0-9]{2})(.)([0-9]{2})(?:(.)([0-9]{4}))?$")
        .expect("Invalid TCF regex")
});

const SECONDS_PER_DAY: u64 = 86_400;

/// Everything in a TCF string apart from the position itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatProperties {
    pub frame_format: FrameFormat,
    pub film_framing: char,
    pub video_field: VideoField,
    pub drop_frame: bool,
}

impl FormatProperties {
    // @creates: Properties for a frame format, film framing mirrors the rate
    pub fn with_frame_format(frame_format: FrameFormat) -> Self {
        Self {
            frame_format,
            film_framing: frame_format.indicator(),
            video_field: VideoField::First,
            drop_frame: false,
        }
    }
}

impl Default for FormatProperties {
    fn default() -> Self {
        Self::with_frame_format(FrameFormat::default())
    }
}

/// A TCF timecode: a position within a 24-hour day with sample accuracy.
///
/// Tokens are immutable values. `adjust` and `resample` return new tokens.
/// The 11 character form has no sample rate; its arithmetic uses the
/// default 48 kHz rate and its text form stays 11 characters long.
#[derive(Debug, Clone, Copy)]
pub struct TcfToken {
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    remainder: u32,
    format: FormatProperties,
    sample_rate: Option<SampleRate>,
}

impl TcfToken {
    /// Build a token from its fields, checking every range
    pub fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        remainder: u32,
        format: FormatProperties,
        sample_rate: Option<SampleRate>,
    ) -> Result<Self, TimecodeError> {
        let token = Self { hours, minutes, seconds, frames, remainder, format, sample_rate };
        token.check_ranges()?;
        Ok(token)
    }

    /// Decode an 11 or 16 character TCF string
    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        let caps = TCF_REGEX
            .captures(text)
            .ok_or_else(|| TimecodeError::InvalidFormat(format!("'{}' is not a TCF timecode", text)))?;

        let number = |i: usize| -> u32 {
            caps.get(i).map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        let indicator = |i: usize| -> char {
            caps.get(i).and_then(|m| m.as_str().chars().next()).unwrap_or('\0')
        };
        let unknown = |what: &str, c: char| {
            TimecodeError::InvalidFormat(format!("unknown {} indicator '{}' in '{}'", what, c, text))
        };

        let frame_format = FrameFormat::from_indicator(indicator(2))
            .ok_or_else(|| unknown("frame rate", indicator(2)))?;
        let film_framing = indicator(4);
        if !is_film_framing_indicator(film_framing) {
            return Err(unknown("film framing", film_framing));
        }
        let (video_field, drop_frame) = VideoField::from_indicator(indicator(6))
            .ok_or_else(|| unknown("video field", indicator(6)))?;
        let sample_rate = match caps.get(8) {
            Some(m) => {
                let c = m.as_str().chars().next().unwrap_or('\0');
                Some(SampleRate::from_indicator(c).ok_or_else(|| unknown("sample rate", c))?)
            }
            None => None,
        };

        let token = Self {
            hours: number(1) as u8,
            minutes: number(3) as u8,
            seconds: number(5) as u8,
            frames: number(7) as u8,
            remainder: number(9),
            format: FormatProperties { frame_format, film_framing, video_field, drop_frame },
            sample_rate,
        };
        token.check_ranges().map_err(|e| match e {
            TimecodeError::OutOfRange { field, reason, .. } => TimecodeError::OutOfRange {
                field,
                value: text.to_string(),
                reason,
            },
            other => other,
        })?;
        Ok(token)
    }

    /// True when the text decodes as a TCF timecode
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    /// Build a token from an absolute sample count
    pub fn from_samples(sample_count: u64, rate: SampleRate, format: FormatProperties) -> Self {
        let mut token = Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            frames: 0,
            remainder: 0,
            format,
            sample_rate: Some(rate),
        };
        token.set_from_samples(sample_count % token.samples_per_day());
        token
    }

    fn check_ranges(&self) -> Result<(), TimecodeError> {
        let out_of_range = |field: &'static str, reason: String| TimecodeError::OutOfRange {
            field,
            value: self.to_string(),
            reason,
        };
        if self.hours > 23 {
            return Err(out_of_range("hours", format!("{} is not below 24", self.hours)));
        }
        if self.minutes > 59 {
            return Err(out_of_range("minutes", format!("{} is not below 60", self.minutes)));
        }
        if self.seconds > 59 {
            return Err(out_of_range("seconds", format!("{} is not below 60", self.seconds)));
        }
        let fc = self.frame_count().frames();
        if u32::from(self.frames) >= fc {
            return Err(out_of_range("frames", format!("{} is not below {}", self.frames, fc)));
        }
        match self.sample_rate {
            Some(rate) => {
                let limit = rate.samples_per_frame_ceil(self.frame_count());
                if u64::from(self.remainder) >= limit {
                    return Err(out_of_range(
                        "remainder",
                        format!("{} is not below {} samples per frame", self.remainder, limit),
                    ));
                }
            }
            None if self.remainder != 0 => {
                return Err(out_of_range("remainder", "no sample rate given".to_string()));
            }
            None => {}
        }
        Ok(())
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn frames(&self) -> u8 {
        self.frames
    }

    pub fn remainder(&self) -> u32 {
        self.remainder
    }

    pub fn format_properties(&self) -> FormatProperties {
        self.format
    }

    pub fn frame_count(&self) -> FrameCount {
        self.format.frame_format.frame_count
    }

    /// Sample rate as written, None for the 11 character form
    pub fn sample_rate(&self) -> Option<SampleRate> {
        self.sample_rate
    }

    /// Sample rate used for arithmetic
    pub fn effective_sample_rate(&self) -> SampleRate {
        self.sample_rate.unwrap_or_default()
    }

    pub fn samples_per_frame(&self) -> u64 {
        self.effective_sample_rate().samples_per_frame(self.frame_count())
    }

    /// Samples from midnight to midnight, as `value_in_samples` counts them
    pub fn samples_per_day(&self) -> u64 {
        self.scaled(1, SECONDS_PER_DAY, 1)
    }

    // floor(count * seconds_num / seconds_den * rate): `count` units that each
    // last seconds_num / seconds_den seconds, in whole samples
    fn scaled(&self, count: u64, seconds_num: u64, seconds_den: u64) -> u64 {
        let (num, den) = self.effective_sample_rate().ratio();
        let samples = u128::from(count) * u128::from(seconds_num) * u128::from(num)
            / (u128::from(den) * u128::from(seconds_den));
        samples as u64
    }

    // Largest count, at most `cap`, whose scaled value does not pass `total`
    fn largest_count(&self, total: u64, seconds_num: u64, seconds_den: u64, cap: u64) -> u64 {
        let (num, den) = self.effective_sample_rate().ratio();
        let below = (u128::from(total) + 1) * u128::from(den) * u128::from(seconds_den) - 1;
        let count = below / (u128::from(seconds_num) * u128::from(num));
        count.min(u128::from(cap)) as u64
    }

    fn total_frames(&self) -> u64 {
        let fc = u64::from(self.frame_count().frames());
        let seconds = u64::from(self.seconds)
            + 60 * (u64::from(self.minutes) + 60 * u64::from(self.hours));
        u64::from(self.frames) + fc * seconds
    }

    /// Position in samples.
    ///
    /// Hours, minutes, seconds and frames are each scaled by the rate and
    /// truncated on their own before the remainder is added. For rates that
    /// are not a whole number of samples per frame this can differ from
    /// `exact_value_in_samples` by a sample.
    pub fn value_in_samples(&self) -> u64 {
        let fc = u64::from(self.frame_count().frames());
        u64::from(self.remainder)
            + self.scaled(u64::from(self.frames), 1, fc)
            + self.scaled(u64::from(self.seconds), 1, 1)
            + self.scaled(u64::from(self.minutes), 60, 1)
            + self.scaled(u64::from(self.hours), 3600, 1)
    }

    /// Position in samples with frame boundaries taken from the exact rate
    pub fn exact_value_in_samples(&self) -> u64 {
        let fc = u64::from(self.frame_count().frames());
        self.scaled(self.total_frames(), 1, fc) + u64::from(self.remainder)
    }

    pub fn as_seconds(&self) -> f64 {
        self.exact_value_in_samples() as f64 / self.effective_sample_rate().hz()
    }

    // Inverse of value_in_samples for totals within one day
    fn set_from_samples(&mut self, total: u64) {
        let fc = u64::from(self.frame_count().frames());

        let hours = self.largest_count(total, 3600, 1, 23);
        let rest = total - self.scaled(hours, 3600, 1);
        let minutes = self.largest_count(rest, 60, 1, 59);
        let rest = rest - self.scaled(minutes, 60, 1);
        let seconds = self.largest_count(rest, 1, 1, 59);
        let rest = rest - self.scaled(seconds, 1, 1);
        let frames = self.largest_count(rest, 1, fc, fc - 1);
        let rest = rest - self.scaled(frames, 1, fc);

        self.hours = hours as u8;
        self.minutes = minutes as u8;
        self.seconds = seconds as u8;
        self.frames = frames as u8;
        self.remainder = rest as u32;
    }

    /// Move the position by a signed number of samples, wrapping within a day.
    ///
    /// An 11 character token gains the default sample rate.
    pub fn adjust(&self, delta_samples: i64) -> Self {
        let mut token = *self;
        token.sample_rate = Some(self.effective_sample_rate());
        let day = i128::from(token.samples_per_day());
        let total = (i128::from(self.value_in_samples()) + i128::from(delta_samples)).rem_euclid(day);
        token.set_from_samples(total as u64);
        token
    }

    /// Convert to another sample rate.
    ///
    /// Only the sample remainder is rescaled, hours through frames stay put.
    pub fn resample(&self, rate: SampleRate) -> Self {
        let old = self.effective_sample_rate();
        let mut token = *self;
        token.sample_rate = Some(rate);
        if old != rate {
            let (old_num, old_den) = old.ratio();
            let (new_num, new_den) = rate.ratio();
            let scaled = u128::from(self.remainder) * u128::from(new_num) * u128::from(old_den)
                / (u128::from(old_num) * u128::from(new_den));
            let limit = rate.samples_per_frame_ceil(self.frame_count()).saturating_sub(1);
            token.remainder = scaled.min(u128::from(limit)) as u32;
        }
        token
    }

    /// Field-by-field comparison, as opposed to the value comparison of `==`
    pub fn is_identical(&self, other: &Self) -> bool {
        self.hours == other.hours
            && self.minutes == other.minutes
            && self.seconds == other.seconds
            && self.frames == other.frames
            && self.remainder == other.remainder
            && self.format == other.format
            && self.sample_rate == other.sample_rate
    }
}

impl Default for TcfToken {
    fn default() -> Self {
        Self::from_samples(0, SampleRate::default(), FormatProperties::default())
    }
}

impl fmt::Display for TcfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}{}{:02}{}{:02}{}{:02}",
            self.hours,
            self.format.frame_format.indicator(),
            self.minutes,
            self.format.film_framing,
            self.seconds,
            self.format.video_field.indicator(self.format.drop_frame),
            self.frames
        )?;
        if let Some(rate) = self.sample_rate {
            write!(f, "{}{:04}", rate.indicator(), self.remainder)?;
        }
        Ok(())
    }
}

impl FromStr for TcfToken {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for TcfToken {
    fn eq(&self, other: &Self) -> bool {
        self.is_identical(other) || self.value_in_samples() == other.value_in_samples()
    }
}

impl Eq for TcfToken {}

impl PartialOrd for TcfToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TcfToken {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_identical(other) {
            return Ordering::Equal;
        }
        self.value_in_samples().cmp(&other.value_in_samples())
    }
}
