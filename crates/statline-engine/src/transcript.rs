use statline_types::TranscriptRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Stream records from a newline-delimited JSON transcript.
///
/// Lines that fail to parse as a record are skipped; a missing or unreadable
/// file yields an empty iterator. Each call re-opens the source.
pub fn transcript_records(path: &Path) -> impl Iterator<Item = TranscriptRecord> {
    File::open(path)
        .ok()
        .map(BufReader::new)
        .into_iter()
        .flat_map(|reader| reader.lines())
        .map_while(|line| line.ok())
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            serde_json::from_str::<TranscriptRecord>(line).ok()
        })
}
