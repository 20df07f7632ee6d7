use std::path::Path;

use crate::data::filter::AgeRange;
use crate::data::loader::load_file;
use crate::data::model::{Field, RecordStore};
use crate::data::views::{DashboardParams, DashboardViews, TableSort};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub store: Option<RecordStore>,

    /// Everything the widgets control.
    pub params: DashboardParams,

    /// Views for the current `params`, rebuilt by [`AppState::recompute`].
    pub views: Option<DashboardViews>,

    /// Age range requested on the command line, applied to the next dataset.
    pub requested_age_range: Option<AgeRange>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            store: None,
            params: DashboardParams::default(),
            views: None,
            requested_age_range: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: clamp the age window to its span and
    /// compute the first set of views.
    pub fn set_store(&mut self, store: RecordStore) {
        let wanted = self.requested_age_range.unwrap_or_default();
        self.params.filter.age_range = match store.age_span() {
            Some(span) => wanted.clamped_to(span),
            None => wanted,
        };
        self.store = Some(store);
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild every view from the store and the current parameters.
    pub fn recompute(&mut self) {
        self.views = self.store.as_ref().map(|store| {
            let views = DashboardViews::compute(store, &self.params);
            log::debug!(
                "recomputed views: {:?} -> {} of {} records",
                self.params.filter,
                views.visible.len(),
                store.len()
            );
            views
        });
    }

    /// Set the age bounds from the sliders, keeping `lo <= hi`.
    pub fn set_age_range(&mut self, lo: u32, hi: u32) {
        let range = AgeRange::new(lo, hi);
        if range != self.params.filter.age_range {
            self.params.filter.age_range = range;
            self.recompute();
        }
    }

    /// Sort the table by `key`; selecting the active key flips the order.
    pub fn sort_table_by(&mut self, key: Field) {
        let current = self.params.table_sort;
        self.params.table_sort = if current.key == key {
            TableSort {
                key,
                order: current.order.flipped(),
            }
        } else {
            TableSort {
                key,
                ..TableSort::default()
            }
        };
        self.recompute();
    }

    /// Load a dataset from disk, replacing the current one on success.
    ///
    /// On failure the previous dataset stays and the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(store) => {
                log::info!(
                    "Loaded {} records from {} (extra columns {:?})",
                    store.len(),
                    path.display(),
                    store.extra_columns()
                );
                self.set_store(store);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
