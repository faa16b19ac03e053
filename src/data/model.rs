use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Column contract with the data producer
// ---------------------------------------------------------------------------

/// Timestamp column, parsed into [`AppointmentRecord::timestamp`].
pub const COL_TIMESTAMP: &str = "Date Time";
/// Staff member column.
pub const COL_STAFF: &str = "Staff Name";
/// Categorical DSS (disability support services) response column.
pub const COL_DSS: &str = "DSS_Response";
/// Free-text statement column, used only for keyword counting.
pub const COL_STATEMENT: &str = "Statement_of_Purpose";

/// The four columns every source file must carry. Anything else in the header
/// is passed through to the raw-data table uninterpreted.
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_TIMESTAMP, COL_STAFF, COL_DSS, COL_STATEMENT];

/// Trigger words for the project-type keyword counter. All lowercase; matching
/// is case-insensitive substring containment.
pub const KEYWORD_VOCABULARY: [&str; 8] = [
    "thesis", "paper", "research", "proposal", "draft", "review", "msw", "writing",
];

// ---------------------------------------------------------------------------
// AppointmentRecord – one row of the source CSV
// ---------------------------------------------------------------------------

/// A single appointment (one row of the source file).
#[derive(Debug, Clone)]
pub struct AppointmentRecord {
    /// When the appointment took place.
    pub timestamp: NaiveDateTime,
    /// Staff member who held the appointment.
    pub staff_name: String,
    /// DSS response; `None` when the cell was blank.
    pub dss_response: Option<String>,
    /// Free-text statement of purpose; `None` when blank.
    pub statement: Option<String>,
    /// Passthrough columns: column name → raw cell text.
    pub extra: BTreeMap<String, String>,
}

impl AppointmentRecord {
    /// Calendar date of the appointment (filters and the time series work on
    /// dates, not datetimes).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

// ---------------------------------------------------------------------------
// AppointmentTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed indexes. Built once per load and
/// never mutated; shared behind an `Arc` by the cache.
#[derive(Debug, Clone)]
pub struct AppointmentTable {
    /// All appointments, in file order.
    pub records: Vec<AppointmentRecord>,
    /// Sorted set of distinct staff names.
    pub staff_names: BTreeSet<String>,
    /// Passthrough column names, in header order.
    pub extra_columns: Vec<String>,
    /// Earliest and latest appointment date, `None` for an empty file.
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl AppointmentTable {
    /// Build the table indexes from loaded records.
    pub fn from_records(records: Vec<AppointmentRecord>, extra_columns: Vec<String>) -> Self {
        let mut staff_names = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            staff_names.insert(rec.staff_name.clone());
            let d = rec.date();
            date_span = Some(match date_span {
                None => (d, d),
                Some((lo, hi)) => (lo.min(d), hi.max(d)),
            });
        }

        AppointmentTable {
            records,
            staff_names,
            extra_columns,
            date_span,
        }
    }

    /// Number of appointments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
