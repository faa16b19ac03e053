use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::model::{AppointmentRecord, AppointmentTable, KEYWORD_VOCABULARY};

/// Bucket label for rows whose categorical cell is blank. Keeping them in the
/// distribution means the chart always sums to the view length.
pub const MISSING_LABEL: &str = "(missing)";

// ---------------------------------------------------------------------------
// Reductions over a filtered view
// ---------------------------------------------------------------------------
//
// Each aggregator is a pure single pass over `(table, view)` where `view` is
// the index list produced by the filter. None of them can fail: an absent
// field simply does not count.

/// Appointments per staff member.
pub fn staff_counts(table: &AppointmentTable, view: &[usize]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for &i in view {
        *counts.entry(table.records[i].staff_name.clone()).or_insert(0) += 1;
    }
    counts
}

/// Distribution of a categorical field; blank cells land in [`MISSING_LABEL`].
pub fn category_counts<F>(
    table: &AppointmentTable,
    view: &[usize],
    field: F,
) -> BTreeMap<String, usize>
where
    F: Fn(&AppointmentRecord) -> Option<&str>,
{
    let mut counts = BTreeMap::new();
    for &i in view {
        let label = field(&table.records[i]).unwrap_or(MISSING_LABEL);
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Appointments per calendar date, ascending. Dates with no appointments are
/// simply absent; the line chart connects across gaps.
pub fn daily_counts(table: &AppointmentTable, view: &[usize]) -> Vec<(NaiveDate, usize)> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for &i in view {
        *counts.entry(table.records[i].date()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Vocabulary hits in the statement texts. Matching is case-insensitive
/// substring containment; one record may hit several keywords. Keywords with
/// no hits are omitted.
pub fn keyword_counts(table: &AppointmentTable, view: &[usize]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for &i in view {
        let Some(text) = table.records[i].statement.as_deref() else {
            continue;
        };
        let lower = text.to_lowercase();
        for word in KEYWORD_VOCABULARY {
            if lower.contains(word) {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Aggregates – one recomputation per interaction
// ---------------------------------------------------------------------------

/// Snapshot of everything the dashboard charts, recomputed by
/// `AppState::refilter` whenever the criteria change.
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub staff: BTreeMap<String, usize>,
    pub dss: BTreeMap<String, usize>,
    pub daily: Vec<(NaiveDate, usize)>,
    pub keywords: BTreeMap<&'static str, usize>,
}

impl Aggregates {
    pub fn compute(table: &AppointmentTable, view: &[usize]) -> Self {
        Aggregates {
            staff: staff_counts(table, view),
            dss: category_counts(table, view, |rec| rec.dss_response.as_deref()),
            daily: daily_counts(table, view),
            keywords: keyword_counts(table, view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterCriteria};
    use std::collections::BTreeMap as Map;

    fn record(date: &str, staff: &str, dss: Option<&str>, text: Option<&str>) -> AppointmentRecord {
        AppointmentRecord {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(11, 0, 0)
                .unwrap(),
            staff_name: staff.to_string(),
            dss_response: dss.map(String::from),
            statement: text.map(String::from),
            extra: Map::new(),
        }
    }

    fn sample_table() -> AppointmentTable {
        AppointmentTable::from_records(
            vec![
                record("2024-01-01", "A", Some("Yes"), Some("final thesis")),
                record("2024-01-02", "B", Some("No"), Some("research proposal")),
                record("2024-01-02", "A", None, None),
                record("2024-01-04", "A", Some("Yes"), Some("Thesis Draft review")),
            ],
            Vec::new(),
        )
    }

    fn full_view(table: &AppointmentTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    #[test]
    fn staff_counts_sum_to_view_length() {
        let t = sample_table();
        let view = full_view(&t);
        let counts = staff_counts(&t, &view);
        assert_eq!(counts.values().sum::<usize>(), view.len());
        assert_eq!(counts.get("A"), Some(&3));
        assert_eq!(counts.get("B"), Some(&1));
    }

    #[test]
    fn category_counts_bucket_missing_values() {
        let t = sample_table();
        let counts = category_counts(&t, &full_view(&t), |rec| rec.dss_response.as_deref());
        assert_eq!(counts.get("Yes"), Some(&2));
        assert_eq!(counts.get("No"), Some(&1));
        assert_eq!(counts.get(MISSING_LABEL), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), t.len());
    }

    #[test]
    fn daily_counts_are_strictly_ascending() {
        let t = sample_table();
        let daily = daily_counts(&t, &full_view(&t));
        assert!(daily.windows(2).all(|w| w[0].0 < w[1].0));
        let expected_day2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(daily.contains(&(expected_day2, 2)));
        // The gap on 2024-01-03 is absent, not zero-filled.
        assert_eq!(daily.len(), 3);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let t = sample_table();
        let counts = keyword_counts(&t, &full_view(&t));
        // "final thesis" and "Thesis Draft review" both hit "thesis".
        assert_eq!(counts.get("thesis"), Some(&2));
        assert_eq!(counts.get("draft"), Some(&1));
        assert_eq!(counts.get("review"), Some(&1));
        // Unmatched vocabulary words are omitted entirely.
        assert_eq!(counts.get("msw"), None);
    }

    #[test]
    fn record_without_statement_still_counts_for_staff() {
        let t = AppointmentTable::from_records(
            vec![record("2024-01-01", "A", Some("Yes"), None)],
            Vec::new(),
        );
        let view = full_view(&t);
        assert_eq!(keyword_counts(&t, &view), Map::new());
        assert_eq!(staff_counts(&t, &view).get("A"), Some(&1));
    }

    #[test]
    fn one_day_one_staff_scenario() {
        let t = sample_table();
        let criteria = FilterCriteria {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            staff: ["A".to_string()].into(),
        };
        let view = filtered_indices(&t, &criteria);
        assert_eq!(view.len(), 1);

        let agg = Aggregates::compute(&t, &view);
        assert_eq!(agg.staff, Map::from([("A".to_string(), 1)]));
        assert_eq!(
            agg.daily,
            vec![(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1)]
        );
        assert_eq!(agg.keywords, Map::from([("thesis", 1)]));
    }

    #[test]
    fn empty_view_yields_empty_aggregates() {
        let t = sample_table();
        let agg = Aggregates::compute(&t, &[]);
        assert!(agg.staff.is_empty());
        assert!(agg.dss.is_empty());
        assert!(agg.daily.is_empty());
        assert!(agg.keywords.is_empty());
    }
}
