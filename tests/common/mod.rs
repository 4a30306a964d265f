/*!
 * Common test utilities for the edml test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use edml::events::{CutSource, EditEntry, EntryKind};
use edml::timecode::{FormatProperties, SampleRate, TcfToken};
use edml::{ChannelRange, Document};

/// A complete document in the exact form the library writes it
pub const SAMPLE_ADL: &str = concat!(
    "<ADL>",
    "\n<VERSION>",
    "\n\t(ADL_ID)\t\"0123456789abcdef\"",
    "\n\t(VER_ADL_VERSION)\t01.01",
    "\n\t(VER_CREATOR)\t\"edml test suite\"",
    "\n\t(VER_CRTR)\t01.00",
    "\n</VERSION>",
    "\n<PROJECT>",
    "\n\t(PROJ_TITLE)\t\"Radio Spot\"",
    "\n\t(PROJ_ORIGINATOR)\t\"Studio A\"",
    "\n\t(PROJ_CREATE_DATE)\t\"2024-03-01 10:30:00\"",
    "\n</PROJECT>",
    "\n<SYSTEM>",
    "\n\t(SYS_SRC_OFFSET)\t00|00|00.00/0000",
    "\n\t(SYS_BIT_DEPTH)\t24",
    "\n\t(SYS_AUD_CODEC)\t\"BWF\"",
    "\n\t(SYS_XFADE_LEN)\t480",
    "\n</SYSTEM>",
    "\n<SEQUENCE>",
    "\n\t(SEQ_SAMPLE_RATE)\tS48000",
    "\n\t(SEQ_FRAME_RATE)\t30",
    "\n\t(SEQ_ADL_LEVEL)\t1",
    "\n\t(SEQ_DEST_START)\t01|00|00.00/0000",
    "\n</SEQUENCE>",
    "\n<TRACKLIST>",
    "\n\t(Track)\t1 \"Dialog\"",
    "\n\t(Track)\t2 _",
    "\n</TRACKLIST>",
    "\n<SOURCE_INDEX>",
    "\n\t(Index)\t0001 (F) \"URL:file://localhost/media/take1.wav\" _ 00|00|00.00/0000 00|01|00.00/0000 \"take1\"",
    "\n\t(Index)\t0002 (F) \"URL:file://localhost/media/take2.wav\" _ 00|00|00.00/0000 00|01|00.00/0000 \"take2\"",
    "\n</SOURCE_INDEX>",
    "\n<EVENT_LIST>",
    "\n\t(Entry)\t0001 (Cut) I 0001 1 1 00|00|00.00/0000 01|00|00.00/0000 01|00|10.00/0000 _",
    "\n\t(Infade)\tLIN _ _ _ 00|00|00.10/0000",
    "\n\t(Entry)\t0002 (Cut) I 0001 2 2 00|00|10.00/0000 01|00|10.00/0000 01|00|20.00/0000 _",
    "\n\t(Xfade)\tCURVE 0.5 _ _ 00|00|00.10/0000 I 0002 00|00|05.00/0000",
    "\n\t(Gain)\t_ -6.00",
    "\n\t(Rem)\tNAME \"Take 2\"",
    "\n\t(Entry)\t0003 (Silence) 3 01|00|00.00/0000 01|00|05.00/0000 _",
    "\n</EVENT_LIST>",
    "\n<FADER_LIST>",
    "\n\t(FP)\t1 01|00|00.00/0000 -3.0",
    "\n</FADER_LIST>",
    "\n<MUTE_LIST>",
    "\n\t(ON)\t2 01|00|02.00/0000",
    "\n\t(OFF)\t2 01|00|04.00/0000",
    "\n</MUTE_LIST>",
    "\n<MARKER_LIST>",
    "\n\t(MK)\t1 01|00|05.00/0000 _ \"Verse\"",
    "\n\t(MK-PQ-START)\t_ 01|00|00.00/0000 _ \"Track 1\"",
    "\n</MARKER_LIST>",
    "\n</ADL>"
);

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Wraps section text in an `<ADL>` root and parses it
pub fn parse_sections(body: &str) -> Document {
    Document::parse(&format!("<ADL>\n{}\n</ADL>", body)).unwrap()
}

/// Parses keyword lines as the content of an `<EVENT_LIST>`
pub fn parse_events(body: &str) -> Document {
    parse_sections(&format!("<EVENT_LIST>\n{}\n</EVENT_LIST>", body))
}

/// Parses a TCF timecode, panicking on malformed test input
pub fn tc(text: &str) -> TcfToken {
    TcfToken::parse(text).unwrap()
}

/// A 30 fps, 48 kHz timecode at a whole number of seconds
pub fn at_seconds(seconds: u64) -> TcfToken {
    TcfToken::from_samples(seconds * 48_000, SampleRate::S48000, FormatProperties::default())
}

/// A cut from source 1 onto `channel`, between two positions in seconds
pub fn cut_entry(number: u32, channel: u32, in_seconds: u64, out_seconds: u64) -> EditEntry {
    let channels = ChannelRange::single(channel).unwrap();
    let source = CutSource::new(1, channels, at_seconds(0));
    EditEntry::new(
        number,
        EntryKind::Cut(source),
        channels,
        at_seconds(in_seconds),
        at_seconds(out_seconds),
    )
}

/// Routes the library's log output through the test harness, set RUST_LOG to see it
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
