use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::aggregate::Aggregates;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::TableCache;
use crate::data::model::AppointmentTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Path-keyed table cache; at most one CSV read per path until reload.
    pub cache: TableCache,

    /// Path of the currently displayed file.
    pub source_path: Option<PathBuf>,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<Arc<AppointmentTable>>,

    /// Current filter selection (None while no table is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Chart inputs, recomputed on every filter change.
    pub aggregates: Aggregates,

    /// Stable colours for staff names.
    pub staff_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the raw-data section is expanded.
    pub show_raw_data: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            cache: TableCache::new(),
            source_path: None,
            table: None,
            criteria: None,
            visible_indices: Vec::new(),
            aggregates: Aggregates::default(),
            staff_colors: ColorMap::default(),
            status_message: None,
            show_raw_data: false,
        }
    }
}

impl AppState {
    /// Load `path` through the cache and make it the displayed table.
    /// Failures keep the previous table and surface in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(table) => self.install_table(path, table),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Re-read the current file from disk, bypassing the cache.
    pub fn reload(&mut self) {
        let Some(path) = self.source_path.clone() else {
            return;
        };
        match self.cache.reload(&path) {
            Ok(table) => self.install_table(&path, table),
            Err(e) => {
                log::error!("Failed to reload {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn install_table(&mut self, path: &Path, table: Arc<AppointmentTable>) {
        self.criteria = Some(FilterCriteria::all_of(&table));
        self.staff_colors = ColorMap::new(table.staff_names.iter().map(String::as_str));
        self.source_path = Some(path.to_path_buf());
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the visible rows and every aggregate after a criteria change.
    /// One full pass per interaction; nothing else is cached between frames.
    pub fn refilter(&mut self) {
        let (Some(table), Some(criteria)) = (&self.table, &self.criteria) else {
            self.visible_indices.clear();
            self.aggregates = Aggregates::default();
            return;
        };
        self.visible_indices = filtered_indices(table, criteria);
        self.aggregates = Aggregates::compute(table, &self.visible_indices);
    }

    /// Toggle one staff member in the selection.
    pub fn toggle_staff(&mut self, name: &str) {
        if let Some(criteria) = self.criteria.as_mut() {
            if !criteria.staff.remove(name) {
                criteria.staff.insert(name.to_string());
            }
        }
        self.refilter();
    }

    /// Select every staff member.
    pub fn select_all_staff(&mut self) {
        if let (Some(table), Some(criteria)) = (&self.table, self.criteria.as_mut()) {
            criteria.staff = table.staff_names.clone();
        }
        self.refilter();
    }

    /// Deselect every staff member (a valid "no rows" state).
    pub fn select_no_staff(&mut self) {
        if let Some(criteria) = self.criteria.as_mut() {
            criteria.staff.clear();
        }
        self.refilter();
    }

    /// Reset the date range to the table's full span.
    pub fn reset_date_range(&mut self) {
        if let (Some(table), Some(criteria)) = (&self.table, self.criteria.as_mut()) {
            if let Some((start, end)) = table.date_span {
                criteria.start = start;
                criteria.end = end;
            }
        }
        self.refilter();
    }
}
