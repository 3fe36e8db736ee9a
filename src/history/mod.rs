pub mod format;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;

use crate::timestamp;

/// Default location of the history file, relative to the working directory.
pub const DEFAULT_PATH: &str = "data/calc_history.txt";

/// One completed calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryRecord {
    /// Short label, e.g. `Addition` or `Root`.
    pub operation: String,
    /// Rendered inputs, e.g. `5 + 3`.
    pub expression: String,
    /// Rendered output, kept exactly as it was formatted at computation time.
    pub result: String,
    /// `YYYY-MM-DD HH:MM:SS` local time.
    pub timestamp: String,
}

impl HistoryRecord {
    pub fn new(
        operation: impl Into<String>,
        expression: impl Into<String>,
        result: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            expression: expression.into(),
            result: result.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Calculations in the order they were made. Appended during a session,
/// replaced wholesale by [`load`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append `record` and return the stored copy.
    pub fn push(&mut self, record: HistoryRecord) -> &HistoryRecord {
        let idx = self.records.len();
        self.records.push(record);
        &self.records[idx]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }
}

impl From<Vec<HistoryRecord>> for HistoryLog {
    fn from(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<HistoryRecord> for HistoryLog {
    fn from_iter<I: IntoIterator<Item = HistoryRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HistoryLog {
    type Item = &'a HistoryRecord;
    type IntoIter = std::slice::Iter<'a, HistoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Create the directory that will hold `path`, if it is missing.
///
/// Failure is logged as a warning and otherwise ignored; the following write
/// reports its own error if the directory really is unusable.
pub fn ensure_storage_location_exists(path: &Path) {
    let Some(dir) = path.parent() else {
        return;
    };
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => tracing::debug!("created history directory {}", dir.display()),
        Err(e) => tracing::warn!("directory creation error: {}: {e}", dir.display()),
    }
}

/// Write every record of `history` to `path`, replacing any previous content.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_history(history: &HistoryLog, path: &Path) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    let mut out = BufWriter::new(file);
    for record in history {
        writeln!(out, "{}", format::encode_line(record))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Persist `history` to `path`, creating its directory first.
///
/// Errors are logged as warnings and swallowed: a failed save never ends the
/// session.
pub fn save(history: &HistoryLog, path: &Path) {
    ensure_storage_location_exists(path);
    match write_history(history, path) {
        Ok(()) => tracing::debug!("saved {} record(s) to {}", history.len(), path.display()),
        Err(e) => tracing::warn!("failed to save history: {e:#}"),
    }
}

/// Parse history file content, one record per line in file order.
pub fn parse(content: &str) -> HistoryLog {
    content
        .lines()
        .map(|line| format::decode_line(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Number of records whose timestamp is not `YYYY-MM-DD HH:MM:SS`.
///
/// Such records are kept as-is; hand-edited files are not rejected.
pub fn count_malformed_timestamps(history: &HistoryLog) -> usize {
    history
        .iter()
        .filter(|r| !timestamp::is_well_formed(&r.timestamp))
        .count()
}

/// Read the history stored at `path`.
///
/// A missing or unreadable file yields an empty log: the first run has no
/// history yet.
pub fn load(path: &Path) -> HistoryLog {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HistoryLog::new(),
        Err(e) => {
            tracing::debug!("history not loaded from {}: {e}", path.display());
            return HistoryLog::new();
        }
    };
    let history = parse(&String::from_utf8_lossy(&bytes));
    tracing::debug!("loaded {} record(s) from {}", history.len(), path.display());
    let malformed = count_malformed_timestamps(&history);
    if malformed > 0 {
        tracing::debug!("{malformed} record(s) in {} have a malformed timestamp", path.display());
    }
    history
}

/// Human-readable listing of `history`.
pub fn render(history: &HistoryLog) -> String {
    if history.is_empty() {
        return "No calculations in history.\n".to_string();
    }
    let mut out = String::from("\n=== Calculation History ===\n");
    for r in history {
        out.push_str(&format!(
            "{} | {} | {} = {}\n",
            r.timestamp, r.operation, r.expression, r.result
        ));
    }
    out
}

/// Write [`render`] output to `out`.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn display(history: &HistoryLog, out: &mut impl Write) -> std::io::Result<()> {
    out.write_all(render(history).as_bytes())
}
