//! JSON Lines export of emitted records
//!
//! One record per line, tagged with its `kind`, in emission order.

use crate::model::Item;
use crate::output::traits::{ItemSink, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes each record as one JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonLinesSink<BufWriter<Box<dyn Write + Send>>> {
    /// Opens `path` for appending; `-` writes to stdout
    pub fn open(path: &str) -> OutputResult<Self> {
        let writer: Box<dyn Write + Send> = if path == "-" {
            Box::new(io::stdout())
        } else {
            Box::new(open_append(Path::new(path))?)
        };

        Ok(Self::new(BufWriter::new(writer)))
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

impl<W: Write + Send> ItemSink for JsonLinesSink<W> {
    fn write(&mut self, item: &Item) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, item)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;
    use tempfile::tempdir;

    #[test]
    fn test_writes_one_line_per_item() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write(&fixtures::user(1).into()).unwrap();
        sink.write(&fixtures::post(2, 0).into()).unwrap();
        assert_eq!(sink.written(), 2);

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Item = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, Item::User(fixtures::user(1)));

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["kind"], "post");
        assert_eq!(second["user"]["id"], 1);
    }

    #[test]
    fn test_open_appends_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/items.jsonl");
        let path_str = path.to_str().unwrap();

        for id in [1, 2] {
            let mut sink = JsonLinesSink::open(path_str).unwrap();
            sink.write(&fixtures::user(id).into()).unwrap();
            sink.flush().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
