//! Output format writers.
//!
//! - [`write_json`] / [`to_json`] - pretty JSON array of messages
//! - [`write_jsonl`] / [`to_jsonl`] - one message object per line
//! - [`write_csv`] / [`to_csv`] - `;`-delimited table of timestamp, sender,
//!   type and content - requires the `csv-output` feature
//! - [`to_summary`] - participants and per-type counts, for humans
//!
//! JSON and JSONL use the [`Message`](crate::message::Message) serialization:
//! participants as names and the message kind flattened in under `"type"`.
//!
//! # Example
//!
//! ```rust
//! use chatdemux::output::{to_json, to_jsonl};
//! use chatdemux::{build_chat, RawEvent};
//!
//! let chat = build_chat(vec![RawEvent::text("Ann", 0, "Ann started a call.")], "Ann")?;
//!
//! let jsonl = to_jsonl(chat.messages())?;
//! assert!(jsonl.contains(r#""type":"call_start""#));
//! assert!(to_json(chat.messages())?.starts_with('['));
//! # Ok::<(), chatdemux::DemuxError>(())
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
mod jsonl_writer;
mod summary;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};
pub use jsonl_writer::{to_jsonl, write_jsonl};
pub use summary::to_summary;
