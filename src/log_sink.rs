use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Utc};

/// Formats a line the way the external log consumers expect:
/// `[YYYY-MM-DD HH:MM:SS] message`.
pub fn timestamped(at: DateTime<Utc>, message: &str) -> String {
    format!("[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message)
}

/// External sink that receives the timestamped result lines of a run.
/// Injected so the evaluator can be tested without real file I/O.
pub trait LogSink: Send + Sync {
    fn append(&self, line: &str) -> Result<(), anyhow::Error>;
}

/// Appends each line to a file, creating it on first use.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) -> Result<(), anyhow::Error> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log sink at {}", self.path.display()))?;
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to append to log sink at {}", self.path.display()))?;
        Ok(())
    }
}

/// Captures lines in memory; a drop-in double for `FileSink` in tests.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("sink mutex poisoned").clone()
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) -> Result<(), anyhow::Error> {
        self.lines
            .lock()
            .expect("sink mutex poisoned")
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use claims::assert_ok;

    use super::{LogSink, MemorySink, timestamped};

    #[test]
    fn lines_carry_a_second_precision_timestamp_prefix() {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 1, 13, 37, 42)
            .single()
            .expect("valid date");
        assert_eq!(
            timestamped(at, "Deleted 3 inactive customers"),
            "[2025-01-01 13:37:42] Deleted 3 inactive customers"
        );
    }

    #[test]
    fn memory_sink_records_lines_in_order() {
        let sink = MemorySink::new();
        assert_ok!(sink.append("first"));
        assert_ok!(sink.append("second"));
        assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);
    }
}
