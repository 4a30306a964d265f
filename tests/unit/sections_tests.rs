/*!
 * Tests for the field holder sections
 */

use chrono::NaiveDate;

use edml::sections::{
    AutomationKind, ProjectSection, Section, SequenceSection, SourceEntry, SystemSection, TracklistSection,
    VersionSection,
};
use edml::timecode::SampleRate;
use crate::common::{parse_sections, tc};

/// Test the version section fields and version number checks
#[test]
fn test_version_section_withValidAndInvalidVersions_shouldCheckFormat() {
    let document = parse_sections(concat!(
        "<VERSION>\n",
        "(VER_ADL_VERSION) 01.00\n",
        "(VER_CREATOR) \"Pyramix\"\n",
        "(VER_CRTR) 8.1a\n",
        "</VERSION>"
    ));
    let version = document.version().unwrap();

    assert_eq!(version.adl_version.as_deref(), Some("01.00"));
    assert_eq!(version.creator.as_deref(), Some("Pyramix"));
    assert_eq!(version.creator_version, None);
    assert_eq!(version.error_count(), 1);
    assert!(version.header().errors()[0].contains("not a dotted version number"));
}

/// Test that an unquoted creation date is joined back together
#[test]
fn test_project_section_withUnquotedDate_shouldJoinTokens() {
    let document = parse_sections("<PROJECT>\n(PROJ_CREATE_DATE) 2024-03-01 10:30:00\n</PROJECT>");
    let project = document.project().unwrap();

    assert_eq!(project.error_count(), 0);
    assert_eq!(project.create_date(), Some("2024-03-01 10:30:00"));
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(10, 30, 0).unwrap();
    assert_eq!(project.created_at(), Some(expected));
}

/// Test the accepted date layouts
#[test]
fn test_parse_date_withSeveralLayouts_shouldAcceptThem() {
    assert!(ProjectSection::parse_date("2024-03-01T10:30:00").is_some());
    assert!(ProjectSection::parse_date("2024:03:01 10:30:00").is_some());
    assert_eq!(
        ProjectSection::parse_date("2024-03-01"),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0)
    );
    assert!(ProjectSection::parse_date("yesterday").is_none());
}

/// Test setting the creation date
#[test]
fn test_set_created_at_withDateTime_shouldWriteCanonicalText() {
    let mut project = ProjectSection::new();
    project.set_created_at(NaiveDate::from_ymd_opt(2023, 12, 24).unwrap().and_hms_opt(18, 0, 5).unwrap());

    assert_eq!(project.create_date(), Some("2023-12-24 18:00:05"));
    assert!(project.to_string().contains("(PROJ_CREATE_DATE)\t\"2023-12-24 18:00:05\""));
}

/// Test the audio codec default
#[test]
fn test_system_section_withoutCodec_shouldDefaultToBwf() {
    let mut system = SystemSection::new();
    assert_eq!(system.audio_codec(), "BWF");

    system.set_audio_codec("WAV");
    assert_eq!(system.audio_codec(), "WAV");
}

/// Test that a crossfade length given as a timecode is converted and reported
#[test]
fn test_system_section_withTimecodeCrossfade_shouldConvertAndReport() {
    let document = parse_sections("<SYSTEM>\n(SYS_XFADE_LEN) 00|00|00.01/0000\n</SYSTEM>");
    let system = document.system().unwrap();

    assert_eq!(system.crossfade_length, Some(1600));
    assert_eq!(system.error_count(), 1);
    assert!(system.header().errors()[0].contains("given as tcf value, should be integer sample count"));
}

/// Test that the gain is written back as read
#[test]
fn test_system_section_withGain_shouldKeepText() {
    let document = parse_sections("<SYSTEM>\n(SYS_GAIN) -1.50\n</SYSTEM>");
    let system = document.system().unwrap();

    assert_eq!(system.gain(), Some(-1.5));
    assert!(system.to_string().contains("(SYS_GAIN)\t-1.50"));
}

/// Test the sequence section's rate checks
#[test]
fn test_sequence_section_withUnknownRates_shouldReportThem() {
    let document = parse_sections(concat!(
        "<SEQUENCE>\n",
        "(SEQ_SAMPLE_RATE) S12345\n",
        "(SEQ_FRAME_RATE) 31\n",
        "(SEQ_ADL_LEVEL) 2\n",
        "</SEQUENCE>"
    ));
    let sequence = document.sequence().unwrap();

    assert_eq!(sequence.sample_rate, None);
    assert_eq!(sequence.frame_rate(), None);
    assert_eq!(sequence.adl_level, Some(2));
    assert_eq!(sequence.error_count(), 2);
}

/// Test setting a frame rate
#[test]
fn test_set_frame_rate_withAllowedAndDisallowedRates_shouldReport() {
    let mut sequence = SequenceSection::new();

    assert!(sequence.set_frame_rate("29.97"));
    assert!(!sequence.set_frame_rate("60"));
    assert_eq!(sequence.frame_rate(), Some("29.97"));
}

/// Test resampling of the sequence section
#[test]
fn test_sequence_section_withResample_shouldSwitchRate() {
    let mut sequence = SequenceSection::new();
    sequence.sample_rate = Some(SampleRate::S48000);
    sequence.dest_start = Some(tc("01|00|00.00/0800"));

    sequence.resample(SampleRate::S96000);

    assert_eq!(sequence.sample_rate, Some(SampleRate::S96000));
    assert_eq!(sequence.dest_start.unwrap().to_string(), "01|00|00.00*1600");
}

/// Test track names and duplicate tracks
#[test]
fn test_tracklist_section_withDuplicateTrack_shouldKeepLastAndReport() {
    let document = parse_sections(concat!(
        "<TRACKLIST>\n",
        "(Track) 1 \"Dialog\"\n",
        "(Track) 3 _\n",
        "(Track) 1 \"Music\"\n",
        "</TRACKLIST>"
    ));
    let tracks = document.tracklist().unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks.track_name(1), Some("Music"));
    assert_eq!(tracks.track_name(3), None);
    assert!(tracks.contains(3));
    assert_eq!(tracks.track_numbers().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(tracks.error_count(), 1);
}

/// Test editing a track list
#[test]
fn test_tracklist_section_withEdits_shouldWriteInTrackOrder() {
    let mut tracks = TracklistSection::new();
    tracks.set_track(2, Some("FX"));
    tracks.set_track(1, None);

    assert_eq!(tracks.to_string(), "\n<TRACKLIST>\n\t(Track)\t1 _\n\t(Track)\t2 \"FX\"\n</TRACKLIST>");
    assert!(tracks.remove_track(1));
    assert!(!tracks.remove_track(1));
}

/// Test source entries with extra fields
#[test]
fn test_source_index_section_withExtraFields_shouldKeepThem() {
    let document = parse_sections(concat!(
        "<SOURCE_INDEX>\n",
        "(Index) 0007 (F) \"URL:file://host/a.wav\" _ 00|00|00.00/0000 _ \"a\" N\n",
        "</SOURCE_INDEX>"
    ));
    let sources = document.source_index().unwrap();
    let entry = sources.entry(7).unwrap();

    assert_eq!(sources.error_count(), 0);
    assert_eq!(entry.url, "URL:file://host/a.wav");
    assert_eq!(entry.length, None);
    assert_eq!(entry.name.as_deref(), Some("a"));
    assert_eq!(entry.extra, vec!["N".to_string()]);
    assert!(sources.to_string().contains("(Index)\t0007 (F) \"URL:file://host/a.wav\" _ 00|00|00.00/0000 _ \"a\" N"));
}

/// Test source entries that arrive out of order or twice
#[test]
fn test_source_index_section_withBadSequence_shouldReport() {
    let document = parse_sections(concat!(
        "<SOURCE_INDEX>\n",
        "(F) \"URL:file://host/orphan.wav\" _ _ _ _\n",
        "(Index) 1 (F) \"URL:file://host/a.wav\" _ _ _ _\n",
        "(Index) 1 (F) \"URL:file://host/b.wav\" _ _ _ _\n",
        "</SOURCE_INDEX>"
    ));
    let sources = document.source_index().unwrap();

    assert_eq!(sources.len(), 1);
    assert_eq!(sources.entry(1).unwrap().url, "URL:file://host/b.wav");
    assert_eq!(sources.error_count(), 2);
    assert!(sources.header().errors()[0].contains("found without a preceding (Index)"));
}

/// Test building source entries in code
#[test]
fn test_source_entry_withInsert_shouldReplaceSameIndex() {
    let mut document = parse_sections("<SOURCE_INDEX>\n</SOURCE_INDEX>");
    let sources = document.source_index_mut().unwrap();

    assert!(sources.insert(SourceEntry::new(1, "URL:file://host/a.wav")).is_none());
    assert!(sources.insert(SourceEntry::new(1, "URL:file://host/b.wav")).is_some());
    assert_eq!(sources.entries().count(), 1);
}

/// Test the three automation lists
#[test]
fn test_automation_sections_withPoints_shouldParseEachKind() {
    let document = parse_sections(concat!(
        "<FADER_LIST>\n(FP) 1 00|00|01.00/0000 -6.0\n(FP) 2 00|00|00.00/0000 0.0\n</FADER_LIST>\n",
        "<MUTE_LIST>\n(ON) 1~2 00|00|02.00/0000\n(OFF) 1~2 00|00|03.00/0000\n</MUTE_LIST>\n",
        "<PAN_LIST>\n(PP) 1 00|00|00.00/0000 0.25\n(XX) 1 00|00|00.00/0000 0.25\n</PAN_LIST>"
    ));
    assert_eq!(document.error_count(), 1);

    let mut faders = document.automation(AutomationKind::Fader).unwrap().clone();
    assert_eq!(faders.points().len(), 2);
    assert_eq!(faders.points()[0].value.as_deref(), Some("-6.0"));
    faders.sort();
    assert_eq!(faders.points()[0].channels.begin(), 2);

    let mutes = document.automation(AutomationKind::Mute).unwrap();
    assert_eq!(mutes.points_for_channel(2).count(), 2);
    assert_eq!(mutes.points()[1].keyword, "OFF");
    assert_eq!(mutes.points()[1].value, None);

    let pans = document.automation(AutomationKind::Pan).unwrap();
    assert_eq!(pans.points().len(), 1);
    assert!(pans.header().errors()[0].contains("Unknown keyword (XX) in PAN_LIST section"));
}

/// Test that empty sections write just their tags
#[test]
fn test_display_withEmptySections_shouldWriteOpenAndCloseTags() {
    assert_eq!(VersionSection::new().to_string(), "\n<VERSION>\n</VERSION>");
    assert_eq!(SystemSection::new().to_string(), "\n<SYSTEM>\n</SYSTEM>");
}
