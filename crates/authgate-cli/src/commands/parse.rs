//! Offline stream file inspection.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use authgate_core::error::AppError;
use authgate_core::types::{Event, Stream};
use authgate_ingest::{MalformedLine, ParsedStreams, parse_file};

use crate::output::{self, OutputFormat};

/// Arguments for the parse command
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Path to the stream file
    pub file: PathBuf,

    /// Also list dropped malformed lines
    #[arg(long)]
    pub show_dropped: bool,
}

/// Stream summary row
#[derive(Debug, Serialize, Tabled)]
pub struct StreamRow {
    /// Stream ID
    pub stream_id: String,
    /// Total events
    pub events: usize,
    /// Login events
    pub ssh: usize,
    /// Elevation events
    pub sudo: usize,
    /// Listing events
    pub dir: usize,
}

impl From<&Stream> for StreamRow {
    fn from(stream: &Stream) -> Self {
        let count = |pred: fn(&Event) -> bool| stream.events().iter().filter(|e| pred(e)).count();
        Self {
            stream_id: stream.id().to_string(),
            events: stream.len(),
            ssh: count(|e| matches!(e, Event::Login { .. })),
            sudo: count(|e| matches!(e, Event::Elevate { .. })),
            dir: count(|e| matches!(e, Event::ListDirectory)),
        }
    }
}

/// Dropped line row
#[derive(Debug, Serialize, Tabled)]
pub struct DroppedRow {
    /// Line number
    pub line: usize,
    /// Stream ID
    pub stream_id: String,
    /// Reason
    pub reason: String,
    /// Content
    pub content: String,
}

impl From<&MalformedLine> for DroppedRow {
    fn from(line: &MalformedLine) -> Self {
        Self {
            line: line.line_number,
            stream_id: line.stream_id.to_string(),
            reason: line.reason.to_string(),
            content: line.content.clone(),
        }
    }
}

/// Execute the parse command
pub fn execute(args: &ParseArgs, format: OutputFormat) -> Result<(), AppError> {
    let parsed = parse_file(&args.file)?;

    if format == OutputFormat::Json {
        output::print_json(&parsed);
        return Ok(());
    }

    print_summary(&parsed, args.show_dropped, format);
    Ok(())
}

fn print_summary(parsed: &ParsedStreams, show_dropped: bool, format: OutputFormat) {
    let rows: Vec<StreamRow> = parsed.streams.iter().map(StreamRow::from).collect();
    output::print_list(&rows, format);

    output::print_success(&format!(
        "{} streams, {} events",
        parsed.streams.len(),
        parsed.event_count()
    ));

    if parsed.dropped.is_empty() {
        return;
    }

    output::print_warning(&format!("{} malformed lines dropped", parsed.dropped.len()));
    if show_dropped {
        output::print_heading("Dropped lines", format);
        let dropped: Vec<DroppedRow> = parsed.dropped.iter().map(DroppedRow::from).collect();
        output::print_list(&dropped, format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_row_counts_event_kinds() {
        let stream = Stream::new(
            "stream-1",
            vec![
                Event::login("guest", "pw"),
                Event::elevate("pw"),
                Event::ListDirectory,
                Event::ListDirectory,
            ],
        );
        let row = StreamRow::from(&stream);
        assert_eq!(row.stream_id, "stream-1");
        assert_eq!((row.events, row.ssh, row.sudo, row.dir), (4, 1, 1, 2));
    }
}
