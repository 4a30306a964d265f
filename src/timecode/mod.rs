/*!
 * TCF timecodes.
 *
 * A TCF string encodes hours, minutes, seconds and frames separated by
 * indicator characters, optionally followed by a sample-rate indicator and
 * a four digit sample remainder:
 *
 * ```text
 * 01|00|02.05/0500
 * HH MM SS FF RRRR
 * ```
 *
 * - `tables`: the fixed indicator tables
 * - `token`: the `TcfToken` value type
 */

pub mod tables;
pub mod token;

pub use tables::{FrameCount, FrameFormat, SampleRate, TimeBase, VideoField};
pub use token::{FormatProperties, TcfToken};
