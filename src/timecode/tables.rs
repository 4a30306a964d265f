/*!
 * Indicator tables of the TCF timecode encoding.
 *
 * Every separator character in a TCF string is an indicator looked up in
 * one of the fixed tables below: frame count and time base, film framing,
 * video field and drop frame, and the AES31 sample rates.
 */

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::errors::TimecodeError;

/// Number of frames per second carried by a timecode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameCount {
    Fps24,
    Fps25,
    Fps30,
}

impl FrameCount {
    // @returns: Frames per second as an integer
    pub fn frames(self) -> u32 {
        match self {
            Self::Fps24 => 24,
            Self::Fps25 => 25,
            Self::Fps30 => 30,
        }
    }
}

/// Time base of the frame count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBase {
    /// The indicator does not specify a time base
    Unspecified,
    /// Real time, factor 1.0
    Nominal,
    /// Pull-down, factor 1001/1000
    Pulldown,
}

impl TimeBase {
    // @returns: Speed factor, None when unspecified
    pub fn factor(self) -> Option<f64> {
        match self {
            Self::Unspecified => None,
            Self::Nominal => Some(1.0),
            Self::Pulldown => Some(1.001),
        }
    }
}

/// Frame count plus time base, encoded by one indicator character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    pub frame_count: FrameCount,
    pub time_base: TimeBase,
}

const FRAME_FORMATS: [(char, FrameCount, TimeBase); 9] = [
    ('?', FrameCount::Fps30, TimeBase::Unspecified),
    ('|', FrameCount::Fps30, TimeBase::Nominal),
    (':', FrameCount::Fps30, TimeBase::Pulldown),
    ('!', FrameCount::Fps25, TimeBase::Unspecified),
    ('.', FrameCount::Fps25, TimeBase::Nominal),
    ('/', FrameCount::Fps25, TimeBase::Pulldown),
    ('#', FrameCount::Fps24, TimeBase::Unspecified),
    ('=', FrameCount::Fps24, TimeBase::Nominal),
    ('-', FrameCount::Fps24, TimeBase::Pulldown),
];

impl FrameFormat {
    pub fn new(frame_count: FrameCount, time_base: TimeBase) -> Self {
        Self { frame_count, time_base }
    }

    pub fn from_indicator(indicator: char) -> Option<Self> {
        FRAME_FORMATS
            .iter()
            .find(|(c, _, _)| *c == indicator)
            .map(|&(_, frame_count, time_base)| Self { frame_count, time_base })
    }

    pub fn indicator(&self) -> char {
        FRAME_FORMATS
            .iter()
            .find(|(_, fc, tb)| *fc == self.frame_count && *tb == self.time_base)
            .map(|(c, _, _)| *c)
            .unwrap_or('|')
    }

    pub fn is_indicator(c: char) -> bool {
        FRAME_FORMATS.iter().any(|(ind, _, _)| *ind == c)
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::new(FrameCount::Fps30, TimeBase::Nominal)
    }
}

/// Video field a timecode refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoField {
    First,
    Second,
}

const VIDEO_FIELDS: [(char, VideoField, bool); 4] = [
    ('.', VideoField::First, false),
    (',', VideoField::First, true),
    (':', VideoField::Second, false),
    (';', VideoField::Second, true),
];

impl VideoField {
    // @returns: Field and drop-frame flag for an indicator
    pub fn from_indicator(indicator: char) -> Option<(Self, bool)> {
        VIDEO_FIELDS
            .iter()
            .find(|(c, _, _)| *c == indicator)
            .map(|&(_, field, drop_frame)| (field, drop_frame))
    }

    pub fn indicator(self, drop_frame: bool) -> char {
        VIDEO_FIELDS
            .iter()
            .find(|(_, field, drop)| *field == self && *drop == drop_frame)
            .map(|(c, _, _)| *c)
            .unwrap_or('.')
    }

    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// Film framing indicators are letters or any frame-rate indicator
pub fn is_film_framing_indicator(c: char) -> bool {
    c.is_ascii_alphabetic() || FrameFormat::is_indicator(c)
}

/// The sample rates defined by AES31-3.
///
/// Variant order matches `SAMPLE_RATES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SampleRate {
    #[default]
    S48000,
    S47952,
    S48048,
    S46080,
    S50000,
    S44100,
    S44055,
    S44144,
    S42336,
    S45937,
    S32000,
    S31968,
    S32032,
    S30720,
    S33333,
    S96000,
    S95904,
    S96096,
    S92160,
    S100000,
    S88200,
    S88111,
    S88288,
    S84672,
    S91875,
}

struct SampleRateInfo {
    rate: SampleRate,
    indicator: char,
    name: &'static str,
    // rate in Hz is numerator / denominator
    numerator: u64,
    denominator: u64,
}

const fn rate_info(
    rate: SampleRate,
    indicator: char,
    name: &'static str,
    numerator: u64,
    denominator: u64,
) -> SampleRateInfo {
    SampleRateInfo { rate, indicator, name, numerator, denominator }
}

static SAMPLE_RATES: [SampleRateInfo; 25] = [
    rate_info(SampleRate::S48000, '/', "S48000", 48_000, 1),
    rate_info(SampleRate::S47952, '-', "S47952", 48_000_000, 1001),
    rate_info(SampleRate::S48048, '+', "S48048", 48_048, 1),
    rate_info(SampleRate::S46080, '<', "S46080", 46_080, 1),
    rate_info(SampleRate::S50000, '>', "S50000", 50_000, 1),
    rate_info(SampleRate::S44100, '|', "S44100", 44_100, 1),
    rate_info(SampleRate::S44055, '~', "S44055", 44_100_000, 1001),
    rate_info(SampleRate::S44144, '^', "S44144", 441_441, 10),
    rate_info(SampleRate::S42336, '[', "S42336", 42_336, 1),
    rate_info(SampleRate::S45937, ']', "S45937", 91_875, 2),
    rate_info(SampleRate::S32000, '=', "S32000", 32_000, 1),
    rate_info(SampleRate::S31968, '\'', "S31968", 32_000_000, 1001),
    rate_info(SampleRate::S32032, '"', "S32032", 32_032, 1),
    rate_info(SampleRate::S30720, '(', "S30720", 30_720, 1),
    rate_info(SampleRate::S33333, ')', "S33333", 100_000, 3),
    rate_info(SampleRate::S96000, '*', "S96000", 96_000, 1),
    rate_info(SampleRate::S95904, '&', "S95904", 96_000_000, 1001),
    rate_info(SampleRate::S96096, '#', "S96096", 96_096, 1),
    rate_info(SampleRate::S92160, '{', "S92160", 92_160, 1),
    rate_info(SampleRate::S100000, '}', "S100000", 100_000, 1),
    rate_info(SampleRate::S88200, '@', "S88200", 88_200, 1),
    rate_info(SampleRate::S88111, '?', "S88111", 88_200_000, 1001),
    rate_info(SampleRate::S88288, '$', "S88288", 882_882, 10),
    rate_info(SampleRate::S84672, '`', "S84672", 84_672, 1),
    rate_info(SampleRate::S91875, '!', "S91875", 91_875, 1),
];

static RATES_BY_INDICATOR: Lazy<HashMap<char, SampleRate>> = Lazy::new(|| {
    SAMPLE_RATES.iter().map(|i| (i.indicator, i.rate)).collect()
});

static RATES_BY_NAME: Lazy<HashMap<&'static str, SampleRate>> = Lazy::new(|| {
    SAMPLE_RATES.iter().map(|i| (i.name, i.rate)).collect()
});

impl SampleRate {
    fn info(self) -> &'static SampleRateInfo {
        &SAMPLE_RATES[self as usize]
    }

    pub fn all() -> impl Iterator<Item = SampleRate> {
        SAMPLE_RATES.iter().map(|i| i.rate)
    }

    pub fn from_indicator(indicator: char) -> Option<Self> {
        RATES_BY_INDICATOR.get(&indicator).copied()
    }

    /// Look up a rate by its `SEQ_SAMPLE_RATE` name, e.g. `S48000`
    pub fn from_name(name: &str) -> Option<Self> {
        RATES_BY_NAME.get(name.to_ascii_uppercase().as_str()).copied()
    }

    /// Look up a rate by its frequency in Hz
    pub fn from_hz(hz: f64) -> Option<Self> {
        Self::all().find(|rate| (rate.hz() - hz).abs() < 0.01)
    }

    pub fn indicator(self) -> char {
        self.info().indicator
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Exact rate as `(numerator, denominator)` in Hz
    pub fn ratio(self) -> (u64, u64) {
        let info = self.info();
        (info.numerator, info.denominator)
    }

    pub fn hz(self) -> f64 {
        let (num, den) = self.ratio();
        num as f64 / den as f64
    }

    /// Whole samples per frame, truncating the fractional part
    pub fn samples_per_frame(self, frame_count: FrameCount) -> u64 {
        let (num, den) = self.ratio();
        num / (den * u64::from(frame_count.frames()))
    }

    /// Smallest integer not below the exact samples per frame
    pub(crate) fn samples_per_frame_ceil(self, frame_count: FrameCount) -> u64 {
        let (num, den) = self.ratio();
        let divisor = den * u64::from(frame_count.frames());
        num.div_ceil(divisor)
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SampleRate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| TimecodeError::InvalidFormat(format!("unknown sample rate name '{}'", s)))
    }
}
