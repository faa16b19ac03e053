use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::AppointmentTable;

// ---------------------------------------------------------------------------
// FilterCriteria – what the sidebar widgets edit
// ---------------------------------------------------------------------------

/// The user's current selection: an inclusive date range and a set of staff
/// names. An empty set or an inverted range are valid and simply match no
/// rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub staff: BTreeSet<String>,
}

impl FilterCriteria {
    /// The dashboard's default selection: the table's full date span and
    /// every staff member.
    pub fn all_of(table: &AppointmentTable) -> Self {
        let (start, end) = table
            .date_span
            .unwrap_or_else(|| (NaiveDate::default(), NaiveDate::default()));
        FilterCriteria {
            start,
            end,
            staff: table.staff_names.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records matching the criteria, in original order.
///
/// A record passes when its calendar date falls inside the inclusive range
/// and its staff name is in the selected set. Single pass, no side effects.
pub fn filtered_indices(table: &AppointmentTable, criteria: &FilterCriteria) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            let d = rec.date();
            d >= criteria.start
                && d <= criteria.end
                && criteria.staff.contains(rec.staff_name.as_str())
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AppointmentRecord;
    use std::collections::BTreeMap;

    fn record(date: &str, staff: &str) -> AppointmentRecord {
        AppointmentRecord {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            staff_name: staff.to_string(),
            dss_response: None,
            statement: None,
            extra: BTreeMap::new(),
        }
    }

    fn table() -> AppointmentTable {
        AppointmentTable::from_records(
            vec![
                record("2024-01-01", "A"),
                record("2024-01-02", "B"),
                record("2024-01-02", "A"),
                record("2024-01-05", "A"),
            ],
            Vec::new(),
        )
    }

    fn criteria(start: &str, end: &str, staff: &[&str]) -> FilterCriteria {
        FilterCriteria {
            start: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            staff: staff.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn bounds_are_inclusive_and_order_is_stable() {
        let t = table();
        let view = filtered_indices(&t, &criteria("2024-01-01", "2024-01-02", &["A", "B"]));
        assert_eq!(view, [0, 1, 2]);
    }

    #[test]
    fn result_is_a_strict_subsequence() {
        let t = table();
        let view = filtered_indices(&t, &criteria("2024-01-02", "2024-01-05", &["A"]));
        assert!(view.windows(2).all(|w| w[0] < w[1]));
        assert!(view.iter().all(|&i| i < t.len()));
    }

    #[test]
    fn refiltering_the_same_criteria_is_idempotent() {
        let t = table();
        let c = criteria("2024-01-01", "2024-01-05", &["A"]);
        let once = filtered_indices(&t, &c);
        // Re-apply the predicate to the already-filtered rows.
        let twice: Vec<usize> = once
            .iter()
            .copied()
            .filter(|&i| {
                let d = t.records[i].date();
                d >= c.start && d <= c.end && c.staff.contains(t.records[i].staff_name.as_str())
            })
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_staff_set_matches_nothing() {
        let t = table();
        let view = filtered_indices(&t, &criteria("2024-01-01", "2024-01-05", &[]));
        assert!(view.is_empty());
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let t = table();
        let view = filtered_indices(&t, &criteria("2024-01-05", "2024-01-01", &["A", "B"]));
        assert!(view.is_empty());
    }

    #[test]
    fn all_of_selects_the_full_table() {
        let t = table();
        let c = FilterCriteria::all_of(&t);
        assert_eq!(filtered_indices(&t, &c).len(), t.len());
    }
}
