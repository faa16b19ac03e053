use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use super::model::{AppointmentRecord, AppointmentTable, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// All errors the data layer can produce. Any of these aborts the load; the
/// table is only ever built from a fully parsed file.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The CSV header row could not be read.
    #[error("Failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    /// A contract column is absent from the header.
    #[error("CSV missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A data row could not be deserialized. `row` is 1-based, counting data
    /// rows (the header is row 0).
    #[error("CSV row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// A timestamp cell did not match any accepted format.
    #[error("CSV row {row}: unrecognised timestamp '{value}'")]
    Timestamp { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Accepted layouts for the `Date Time` column. The export tool emits the
/// first; the rest cover spreadsheets that have round-tripped through Excel.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
];

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date Time")]
    date_time: String,
    #[serde(rename = "Staff Name")]
    staff_name: String,
    #[serde(rename = "DSS_Response")]
    dss_response: String,
    #[serde(rename = "Statement_of_Purpose")]
    statement: String,
    #[serde(flatten)]
    extra: BTreeMap<String, String>,
}

/// Load an appointment table from a CSV file.
///
/// The whole file is read into memory. Unparseable timestamps abort the load
/// with the offending row number rather than silently dropping rows, so every
/// chart downstream counts the same population.
pub fn load_table(path: &Path) -> Result<AppointmentTable, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| DataError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(DataError::Header)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataError::MissingColumn(col));
        }
    }

    let extra_columns: Vec<String> = headers
        .iter()
        .filter(|h| !REQUIRED_COLUMNS.contains(&h.as_str()))
        .cloned()
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawRow>().enumerate() {
        let row = i + 1;
        let raw = result.map_err(|source| DataError::Row { row, source })?;

        let timestamp =
            parse_timestamp(raw.date_time.trim()).ok_or_else(|| DataError::Timestamp {
                row,
                value: raw.date_time.clone(),
            })?;

        records.push(AppointmentRecord {
            timestamp,
            staff_name: raw.staff_name.trim().to_string(),
            dss_response: blank_to_none(&raw.dss_response),
            statement: blank_to_none(&raw.statement),
            extra: raw.extra,
        });
    }

    log::info!(
        "Loaded {} appointments from {} ({} passthrough columns)",
        records.len(),
        path.display(),
        extra_columns.len()
    );

    Ok(AppointmentTable::from_records(records, extra_columns))
}

/// Try each accepted format in turn; a bare date parses to midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Blank or whitespace-only cells mean "absent".
fn blank_to_none(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// TableCache – at most one read per path until invalidated
// ---------------------------------------------------------------------------

/// Path-keyed memoization of loaded tables. The UI asks for the table on
/// every interaction; only the first ask per path touches the disk. `reload`
/// is the explicit invalidation handle (File → Reload).
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<PathBuf, Arc<AppointmentTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<AppointmentTable>, DataError> {
        if let Some(table) = self.tables.get(path) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_table(path)?);
        self.tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Drop the cached entry for `path`; the next `get_or_load` re-reads.
    pub fn invalidate(&mut self, path: &Path) {
        self.tables.remove(path);
    }

    /// Force a fresh read of `path`.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<AppointmentTable>, DataError> {
        self.invalidate(path);
        self.get_or_load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Date Time,Staff Name,DSS_Response,Statement_of_Purpose,Student Level";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_records_and_passthrough_columns() {
        let file = write_csv(&[
            HEADER,
            "2024-01-02 09:30:00,Avery,Yes,Final thesis draft,Masters",
            "2024-01-03 14:00:00,Blake,No,,Doctoral",
        ]);

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.extra_columns, ["Student Level"]);

        let first = &table.records[0];
        assert_eq!(
            first.timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap()
        );
        assert_eq!(first.staff_name, "Avery");
        assert_eq!(first.dss_response.as_deref(), Some("Yes"));
        assert_eq!(first.extra.get("Student Level").map(String::as_str), Some("Masters"));

        // Blank statement cell becomes None.
        assert_eq!(table.records[1].statement, None);
    }

    #[test]
    fn accepts_alternate_timestamp_layouts() {
        let file = write_csv(&[
            HEADER,
            "01/02/2024 09:30,Avery,Yes,,Masters",
            "2024-01-03,Blake,No,,Doctoral",
        ]);

        let table = load_table(file.path()).unwrap();
        assert_eq!(
            table.records[0].timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        // Bare date parses to midnight.
        assert_eq!(
            table.records[1].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn missing_column_is_rejected() {
        let file = write_csv(&[
            "Date Time,Staff Name,Statement_of_Purpose",
            "2024-01-02 09:30:00,Avery,thesis",
        ]);

        match load_table(file.path()) {
            Err(DataError::MissingColumn(col)) => assert_eq!(col, "DSS_Response"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn bad_timestamp_aborts_with_row_number() {
        let file = write_csv(&[
            HEADER,
            "2024-01-02 09:30:00,Avery,Yes,,Masters",
            "not a date,Blake,No,,Doctoral",
        ]);

        match load_table(file.path()) {
            Err(DataError::Timestamp { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("expected Timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_table(Path::new("/no/such/file.csv")).unwrap_err();
        assert!(matches!(err, DataError::FileRead { .. }));
    }

    #[test]
    fn cache_loads_once_per_path() {
        let file = write_csv(&[HEADER, "2024-01-02 09:30:00,Avery,Yes,,Masters"]);

        let mut cache = TableCache::new();
        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn reload_picks_up_new_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appointments.csv");

        std::fs::write(&path, format!("{HEADER}\n2024-01-02 09:30:00,Avery,Yes,,Masters\n"))
            .unwrap();

        let mut cache = TableCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);

        std::fs::write(
            &path,
            format!(
                "{HEADER}\n2024-01-02 09:30:00,Avery,Yes,,Masters\n2024-01-03 10:00:00,Blake,No,,Doctoral\n"
            ),
        )
        .unwrap();

        // Cached entry still serves the old table until reload.
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);
        assert_eq!(cache.reload(&path).unwrap().len(), 2);
    }
}
