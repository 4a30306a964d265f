/*!
 * Tests for TCF timecodes and the indicator tables
 */

use std::cmp::Ordering;

use edml::errors::TimecodeError;
use edml::timecode::{FormatProperties, FrameCount, FrameFormat, SampleRate, TcfToken, TimeBase, VideoField};
use crate::common::tc;

/// Test decoding of the 16 character form
#[test]
fn test_parse_withLongForm_shouldDecodeEveryField() {
    let token = tc("01|00|02.05/0500");

    assert_eq!(token.hours(), 1);
    assert_eq!(token.minutes(), 0);
    assert_eq!(token.seconds(), 2);
    assert_eq!(token.frames(), 5);
    assert_eq!(token.remainder(), 500);
    assert_eq!(token.sample_rate(), Some(SampleRate::S48000));
    assert_eq!(token.frame_count(), FrameCount::Fps30);
    assert_eq!(token.to_string(), "01|00|02.05/0500");
}

/// Test the indicator characters of a drop-frame pull-down timecode
#[test]
fn test_parse_withDropFrameIndicators_shouldDecodeFormat() {
    let token = tc("00:00:00;00");
    let format = token.format_properties();

    assert_eq!(format.frame_format, FrameFormat::new(FrameCount::Fps30, TimeBase::Pulldown));
    assert_eq!(format.video_field, VideoField::Second);
    assert!(format.drop_frame);
    assert_eq!(token.to_string(), "00:00:00;00");
}

/// Test that the film framing letter survives a round trip
#[test]
fn test_parse_withFilmFramingLetter_shouldRoundTrip() {
    let token = tc("10=20A30.12|0100");

    assert_eq!(token.format_properties().film_framing, 'A');
    assert_eq!(token.frame_count(), FrameCount::Fps24);
    assert_eq!(token.sample_rate(), Some(SampleRate::S44100));
    assert_eq!(token.to_string(), "10=20A30.12|0100");
}

/// Test the rejection of malformed timecodes
#[test]
fn test_parse_withMalformedText_shouldReturnInvalidFormat() {
    for text in ["0|00|00.00", "00|00|00.00/000", "00x00|00.00", "00|00|00x00", "00|00|00.00X0000", ""] {
        assert!(
            matches!(TcfToken::parse(text), Err(TimecodeError::InvalidFormat(_))),
            "{} should not parse",
            text
        );
        assert!(!TcfToken::is_valid(text));
    }
}

/// Test the range checks of every numeric field
#[test]
fn test_parse_withOutOfRangeFields_shouldNameTheField() {
    let cases = [
        ("24|00|00.00/0000", "hours"),
        ("00|60|00.00/0000", "minutes"),
        ("00|00|60.00/0000", "seconds"),
        ("00|00|00.30/0000", "frames"),
        ("00.00.00.25/0000", "frames"),
        ("00|00|00.00/1600", "remainder"),
    ];

    for (text, expected) in cases {
        match TcfToken::parse(text) {
            Err(TimecodeError::OutOfRange { field, value, .. }) => {
                assert_eq!(field, expected, "{}", text);
                assert_eq!(value, text);
            }
            other => panic!("{} gave {:?}", text, other),
        }
    }
}

/// Test that the NTSC remainder limit rounds up
#[test]
fn test_parse_withNtscRemainder_shouldAllowFractionalFrame() {
    // 44055.94 Hz at 30 fps is 1468.53 samples per frame
    assert!(TcfToken::is_valid("00|00|00.00~1468"));
    assert!(!TcfToken::is_valid("00|00|00.00~1469"));
}

/// Test sample values of the long and short forms
#[test]
fn test_value_in_samples_withKnownPositions_shouldMatch() {
    assert_eq!(tc("00|00|01.00/0000").value_in_samples(), 48_000);
    assert_eq!(tc("01|00|02.05/0500").value_in_samples(), 3600 * 48_000 + 2 * 48_000 + 5 * 1600 + 500);
    assert_eq!(tc("00|00|01.00").value_in_samples(), 48_000);
    assert_eq!(tc("00.00.01.00/0000").value_in_samples(), 48_000);
}

/// Test that each position term is truncated on its own at an NTSC rate
#[test]
fn test_value_in_samples_withNtscRate_shouldTruncateEachTerm() {
    assert_eq!(tc("01|00|00.00~0000").value_in_samples(), 158_601_398);
    assert_eq!(tc("00|00|01.00~0000").value_in_samples(), 44_055);
    // 44055 + trunc(44055.94 / 30)
    assert_eq!(tc("00|00|01.01~0000").value_in_samples(), 45_523);
}

/// Test per-term against exact frame arithmetic for an NTSC rate
#[test]
fn test_exact_value_in_samples_withNtscRate_shouldDifferFromPerTerm() {
    let token = tc("00|00|01.01~0000");

    assert_eq!(token.samples_per_frame(), 1468);
    assert_eq!(token.exact_value_in_samples(), 45_524);
    assert_eq!(token.value_in_samples() + 1, token.exact_value_in_samples());
    assert_eq!(tc("01|00|00.00~0000").exact_value_in_samples(), 158_601_398);
}

/// Test that whole rates agree between both arithmetics
#[test]
fn test_exact_value_in_samples_withWholeRate_shouldEqualTruncated() {
    let token = tc("12|34|56.07/0123");
    assert_eq!(token.exact_value_in_samples(), token.value_in_samples());
}

/// Test conversion to seconds
#[test]
fn test_as_seconds_withHalfSecond_shouldReturnFraction() {
    let token = tc("00|00|01.15/0000");
    assert!((token.as_seconds() - 1.5).abs() < 1e-9);
}

/// Test adjusting by a single sample
#[test]
fn test_adjust_withOneSample_shouldIncrementRemainder() {
    let token = tc("01|00|02.05/0500");
    let moved = token.adjust(1);

    assert_eq!(moved.to_string(), "01|00|02.05/0501");
    assert_eq!(moved.value_in_samples(), token.value_in_samples() + 1);
    // the original is untouched
    assert_eq!(token.to_string(), "01|00|02.05/0500");
}

/// Test borrowing across a frame boundary
#[test]
fn test_adjust_withNegativeDelta_shouldBorrowFromFrames() {
    let moved = tc("01|00|02.05/0500").adjust(-501);
    assert_eq!(moved.to_string(), "01|00|02.04/1599");
}

/// Test wrapping at both ends of the day
#[test]
fn test_adjust_pastMidnight_shouldWrapWithinTheDay() {
    assert_eq!(tc("00|00|00.00/0000").adjust(-1).to_string(), "23|59|59.29/1599");
    assert_eq!(tc("23|59|59.29/1599").adjust(1).to_string(), "00|00|00.00/0000");
}

/// Test that the 11 character form gains the default rate when adjusted
#[test]
fn test_adjust_withShortForm_shouldMaterializeDefaultRate() {
    let moved = tc("00|00|00.00").adjust(1);

    assert_eq!(moved.sample_rate(), Some(SampleRate::S48000));
    assert_eq!(moved.to_string(), "00|00|00.00/0001");
}

/// Test that adjust moves the value by exactly the delta for an NTSC rate
#[test]
fn test_adjust_withNtscRate_shouldMoveValueExactly() {
    let token = tc("00|10|00.00~0000");
    assert_eq!(token.adjust(12_345).value_in_samples(), token.value_in_samples() + 12_345);

    let late = tc("13|59|59.29~1400");
    for delta in [1, 67, 68, 1_469, -1, -44_056] {
        assert_eq!(late.adjust(delta).value_in_samples() as i64, late.value_in_samples() as i64 + delta);
    }
}

/// Test that one sample past the last frame of a second carries into the next second
#[test]
fn test_adjust_withNtscRate_shouldCarryIntoNextSecond() {
    let token = tc("00|00|00.29~1467");
    assert_eq!(token.value_in_samples(), 44_054);

    let moved = token.adjust(1);
    assert_eq!(moved.to_string(), "00|00|01.00~0000");
    assert_eq!(moved.value_in_samples(), 44_055);
}

/// Test building a token from a sample count
#[test]
fn test_from_samples_withOneHour_shouldDecompose() {
    let token = TcfToken::from_samples(3600 * 48_000 + 1601, SampleRate::S48000, FormatProperties::default());
    assert_eq!(token.to_string(), "01|00|00.01/0001");
}

/// Test resampling of the remainder
#[test]
fn test_resample_withDoubleRate_shouldScaleRemainderOnly() {
    let token = tc("00|00|01.03/0500").resample(SampleRate::S96000);

    assert_eq!(token.to_string(), "00|00|01.03*1000");
    assert_eq!(token.sample_rate(), Some(SampleRate::S96000));
}

/// Test that resampling twice to the same rate changes nothing more
#[test]
fn test_resample_twice_shouldBeIdempotent() {
    let token = tc("05|06|07.08~1234");
    let once = token.resample(SampleRate::S88200);
    let twice = once.resample(SampleRate::S88200);

    assert!(once.is_identical(&twice));
}

/// Test that a resampled remainder stays below the frame length
#[test]
fn test_resample_withLargeRemainder_shouldStayValid() {
    let token = tc("00|00|00.00/1599").resample(SampleRate::S44055);

    assert!(token.remainder() < 1469);
    assert!(TcfToken::is_valid(&token.to_string()));
}

/// Test that ordering follows the sample value
#[test]
fn test_ordering_withDifferentPositions_shouldFollowValue() {
    let earlier = tc("00|00|01.00/0000");
    let later = tc("00|00|01.00/0001");

    assert!(earlier < later);
    assert_eq!(earlier.cmp(&later), Ordering::Less);
    assert_eq!(later.cmp(&earlier), Ordering::Greater);
    assert_eq!(earlier.value_in_samples() < later.value_in_samples(), earlier < later);
}

/// Test that equal values in different formats compare equal
#[test]
fn test_equality_withDifferentFormatsSameValue_shouldBeEqual() {
    let thirty = tc("00|00|01.00/0000");
    let twenty_four = tc("00=00=01.00/0000");

    assert!(!thirty.is_identical(&twenty_four));
    assert_eq!(thirty, twenty_four);
    assert_eq!(thirty.cmp(&twenty_four), Ordering::Equal);
}

/// Test parsing through FromStr
#[test]
fn test_from_str_withValidText_shouldMatchParse() {
    let parsed: TcfToken = "00|00|02.00/0000".parse().unwrap();
    assert!(parsed.is_identical(&tc("00|00|02.00/0000")));
}

/// Test the default token
#[test]
fn test_default_shouldBeMidnightAt48k() {
    assert_eq!(TcfToken::default().to_string(), "00|00|00.00/0000");
}

/// Test the sample rate lookups
#[test]
fn test_sample_rate_lookups_withKnownRates_shouldResolve() {
    assert_eq!(SampleRate::from_name("s44100"), Some(SampleRate::S44100));
    assert_eq!(SampleRate::from_indicator('*'), Some(SampleRate::S96000));
    assert_eq!(SampleRate::from_hz(44_100.0), Some(SampleRate::S44100));
    assert_eq!(SampleRate::from_hz(12_345.0), None);
    assert_eq!(SampleRate::S47952.to_string(), "S47952");
    assert_eq!("S88200".parse::<SampleRate>().unwrap(), SampleRate::S88200);
    assert!("S12345".parse::<SampleRate>().is_err());
    assert_eq!(SampleRate::all().count(), 25);
}

/// Test every frame rate indicator round trip
#[test]
fn test_frame_format_indicators_withEveryEntry_shouldRoundTrip() {
    for c in ['?', '|', ':', '!', '.', '/', '#', '=', '-'] {
        let format = FrameFormat::from_indicator(c).unwrap();
        assert_eq!(format.indicator(), c);
    }
    assert!(FrameFormat::from_indicator('x').is_none());
    assert_eq!(TimeBase::Pulldown.factor(), Some(1.001));
    assert_eq!(TimeBase::Unspecified.factor(), None);
}
