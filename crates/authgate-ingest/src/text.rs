//! Offline text format.
//!
//! ```text
//! #stream-1
//! ssh,dev_user,d3v3l0p3r
//! sudo,d3v3l0p3r
//! dir
//! ```
//!
//! A `#` line starts a new stream whose id is the rest of the line. Event
//! lines are comma separated; extra trailing fields are ignored. Lines with
//! too few fields or an unknown event type are dropped from their stream and
//! reported in [`ParsedStreams::dropped`]. Blank lines and lines before the
//! first header are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::types::{Event, Stream, StreamId};

/// Why an event line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MalformedReason {
    /// The event type needs more fields than the line has.
    #[error("'{kind}' expects at least {expected} fields, found {found}")]
    TooFewFields {
        kind: String,
        expected: usize,
        found: usize,
    },
    /// The first field is not a known event type.
    #[error("unknown event type '{kind}'")]
    UnknownKind { kind: String },
}

/// A dropped event line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedLine {
    /// 1-based line number in the input.
    pub line_number: usize,
    /// Stream the line belonged to.
    pub stream_id: StreamId,
    /// The line as read, trimmed.
    pub content: String,
    /// What was wrong with it.
    pub reason: MalformedReason,
}

/// Result of parsing a text input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedStreams {
    /// Streams in input order.
    pub streams: Vec<Stream>,
    /// Event lines that were dropped.
    pub dropped: Vec<MalformedLine>,
}

impl ParsedStreams {
    /// Total events across every stream.
    pub fn event_count(&self) -> usize {
        self.streams.iter().map(Stream::len).sum()
    }
}

/// Parse a single event line.
pub fn parse_event(line: &str) -> Result<Event, MalformedReason> {
    let fields: Vec<&str> = line.split(',').collect();
    let kind = fields[0];

    let require = |expected: usize| {
        if fields.len() >= expected {
            Ok(())
        } else {
            Err(MalformedReason::TooFewFields {
                kind: kind.to_string(),
                expected,
                found: fields.len(),
            })
        }
    };

    match kind {
        "ssh" => {
            require(3)?;
            Ok(Event::login(fields[1], fields[2]))
        }
        "sudo" => {
            require(2)?;
            Ok(Event::elevate(fields[1]))
        }
        "dir" => Ok(Event::ListDirectory),
        other => Err(MalformedReason::UnknownKind {
            kind: other.to_string(),
        }),
    }
}

/// Parse streams from an in-memory string.
pub fn parse_streams(input: &str) -> ParsedStreams {
    let mut parser = Parser::default();
    for (idx, line) in input.lines().enumerate() {
        parser.feed(idx + 1, line);
    }
    parser.finish()
}

/// Parse streams from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> AppResult<ParsedStreams> {
    let mut parser = Parser::default();
    for (idx, line) in reader.lines().enumerate() {
        parser.feed(idx + 1, &line?);
    }
    Ok(parser.finish())
}

/// Parse streams from a file on disk.
pub fn parse_file(path: impl AsRef<Path>) -> AppResult<ParsedStreams> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        AppError::with_source(
            authgate_core::error::ErrorKind::Io,
            format!("Failed to open '{}'", path.display()),
            e,
        )
    })?;
    parse_reader(BufReader::new(file))
}

#[derive(Default)]
struct Parser {
    current: Option<(StreamId, Vec<Event>)>,
    parsed: ParsedStreams,
}

impl Parser {
    fn feed(&mut self, line_number: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        if let Some(header) = line.strip_prefix('#') {
            let id = header.trim();
            self.flush();
            if id.is_empty() {
                // Lines up to the next valid header belong to no stream.
                warn!(line = line_number, "Ignoring stream header without an id");
                return;
            }
            self.current = Some((StreamId::new(id), Vec::new()));
            return;
        }

        let Some((stream_id, events)) = self.current.as_mut() else {
            return;
        };

        match parse_event(line) {
            Ok(event) => events.push(event),
            Err(reason) => {
                warn!(
                    stream_id = %stream_id,
                    line = line_number,
                    reason = %reason,
                    "Dropping malformed event line"
                );
                self.parsed.dropped.push(MalformedLine {
                    line_number,
                    stream_id: stream_id.clone(),
                    content: line.to_string(),
                    reason,
                });
            }
        }
    }

    fn flush(&mut self) {
        if let Some((id, events)) = self.current.take() {
            self.parsed.streams.push(Stream::new(id, events));
        }
    }

    fn finish(mut self) -> ParsedStreams {
        self.flush();
        self.parsed
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "\
#stream-1
ssh,dev_user,d3v3l0p3r
sudo,d3v3l0p3r
dir

#stream-2
ssh,guest
ssh,guest,T3mpPass!,extra
scp,file
sudo
dir
";

    #[test]
    fn test_parse_sample() {
        let parsed = parse_streams(SAMPLE);

        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.streams[0].id().as_str(), "stream-1");
        assert_eq!(
            parsed.streams[0].events(),
            &[
                Event::login("dev_user", "d3v3l0p3r"),
                Event::elevate("d3v3l0p3r"),
                Event::ListDirectory,
            ]
        );
        assert_eq!(
            parsed.streams[1].events(),
            &[Event::login("guest", "T3mpPass!"), Event::ListDirectory]
        );
        assert_eq!(parsed.event_count(), 5);
    }

    #[test]
    fn test_dropped_lines_are_reported() {
        let parsed = parse_streams(SAMPLE);

        let lines: Vec<usize> = parsed.dropped.iter().map(|d| d.line_number).collect();
        assert_eq!(lines, vec![7, 9, 10]);
        assert_eq!(
            parsed.dropped[0].reason,
            MalformedReason::TooFewFields {
                kind: "ssh".to_string(),
                expected: 3,
                found: 2,
            }
        );
        assert_eq!(
            parsed.dropped[1].reason,
            MalformedReason::UnknownKind {
                kind: "scp".to_string()
            }
        );
        assert!(parsed.dropped.iter().all(|d| d.stream_id.as_str() == "stream-2"));
    }

    #[test]
    fn test_lines_before_first_header_are_ignored() {
        let parsed = parse_streams("dir\nssh,a,b\n#s1\ndir\n");
        assert_eq!(parsed.streams.len(), 1);
        assert_eq!(parsed.streams[0].len(), 1);
        assert!(parsed.dropped.is_empty());
    }

    #[test]
    fn test_blank_header_closes_previous_stream() {
        let parsed = parse_streams("#s1\nssh,a,b\n#\ndir\n#s2\ndir\n");

        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.streams[0].events(), &[Event::login("a", "b")]);
        assert_eq!(parsed.streams[1].id().as_str(), "s2");
        assert_eq!(parsed.streams[1].events(), &[Event::ListDirectory]);
        assert!(parsed.dropped.is_empty());
    }

    #[test]
    fn test_header_without_events_yields_empty_stream() {
        let parsed = parse_streams("#s1\n#s2\ndir\n");
        assert_eq!(parsed.streams.len(), 2);
        assert!(parsed.streams[0].is_empty());
        assert_eq!(parsed.streams[1].len(), 1);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let parsed = parse_streams("  # s1  \n  ssh,guest,pw  \r\n");
        assert_eq!(parsed.streams[0].id().as_str(), "s1");
        assert_eq!(parsed.streams[0].events(), &[Event::login("guest", "pw")]);
    }

    #[test]
    fn test_parse_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE.as_bytes()).expect("write");

        let parsed = parse_file(file.path()).expect("parse");
        assert_eq!(parsed.streams.len(), 2);
        assert_eq!(parsed.dropped.len(), 3);
    }

    #[test]
    fn test_parse_file_missing_is_io_error() {
        let err = parse_file("/definitely/not/here.txt").expect_err("missing");
        assert_eq!(err.kind, authgate_core::error::ErrorKind::Io);
    }
}
