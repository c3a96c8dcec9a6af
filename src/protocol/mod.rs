//! Protocol Module
//!
//! Defines the text wire protocol spoken to the queue server.
//!
//! ## Protocol Format
//!
//! Every command is one ASCII line ending in `\r\n`. Only `put` carries a
//! body, sent right after the line and followed by its own `\r\n`.
//!
//! ### Replies
//! - Error tokens: `OUT_OF_MEMORY`, `INTERNAL_ERROR`, `DRAINING`,
//!   `BAD_FORMAT`, `UNKNOWN_COMMAND`, `NOT_FOUND`, `JOB_TOO_BIG`,
//!   `EXPECTED_CRLF`, `DEADLINE_SOON`, `TIMED_OUT`, `NOT_IGNORED`
//! - Success lines: `INSERTED <id>`, `RESERVED <id> <bytes>`,
//!   `WATCHING <count>`, `OK <bytes>`, `DELETED`, ...
//!
//! `RESERVED`, `FOUND` and `OK` are followed by exactly `<bytes>` body
//! bytes and a trailing `\r\n`.

mod command;
mod response;
mod codec;
mod yaml;

pub use command::{validate_tube_name, Command, MAX_TUBE_NAME_LEN};
pub use response::{parse_reply, Job, Reply};
pub use codec::{encode_command, read_body, read_line, write_command, CRLF, MAX_LINE_LENGTH};
pub use yaml::{decode_list, decode_stats, Stats};
