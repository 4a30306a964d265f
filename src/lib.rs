/*!
 * # edml - AES31-3 Audio Decision List toolkit
 *
 * A Rust library for reading, checking and rewriting EDML/ADL documents,
 * the text based Audio Decision Lists of AES31-3.
 *
 * ## Features
 *
 * - Tolerant parsing that recovers from overlapping or missing section tags
 * - Sample accurate TCF timecodes for all 25 AES31 sample rates
 * - Queries over the edit event list by channel, time and source
 * - Resampling of whole documents and re-sorting of event lists
 * - Text output that reads back to the same document
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `lexer`: Tokenizer with push-back and replay
 * - `timecode`: TCF timecodes:
 *   - `timecode::tables`: Indicator character tables
 *   - `timecode::token`: The `TcfToken` value type
 * - `sections`: Field holders for every section kind
 * - `events`: The EVENT_LIST store and its edit entries
 * - `document`: Document assembly and the section parsing protocol
 * - `fields`: Shared field conversion helpers
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 *
 * ## Example
 *
 * ```
 * use edml::Document;
 *
 * let text = "<ADL>\n<SYSTEM>\n\t(SYS_BIT_DEPTH)\t24\n</SYSTEM>\n</ADL>";
 * let document = Document::parse(text).unwrap();
 * assert_eq!(document.error_count(), 0);
 * assert_eq!(document.to_string(), text);
 * ```
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod document;
pub mod errors;
pub mod events;
pub mod fields;
pub mod file_utils;
pub mod lexer;
pub mod sections;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::{Config, ParserConfig};
pub use document::{Document, SectionBody, SectionKind};
pub use errors::{AdlError, FieldError, TimecodeError};
pub use events::{EditEntry, EntryType, EventListSection};
pub use fields::ChannelRange;
pub use lexer::{Lexer, Token, TokenKind};
pub use timecode::{SampleRate, TcfToken};
