//! Frequency and clade-defining filters over the mutation grid.
//!
//! Filters hide cells; they never touch the aligned axis or the store,
//! and they never drop rows. A strain with zero visible cells still
//! occupies its row.

use crate::alignment::MutationGrid;
use crate::mutation::MutationRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Cells with `frequency >= min_frequency` stay visible. The boundary
    /// is inclusive: a cell exactly at the threshold is shown.
    pub min_frequency: f64,
    /// Optional upper bound, also inclusive. The frequency slider has
    /// two ends.
    pub max_frequency: Option<f64>,
    /// When set, only cells whose record is flagged clade-defining stay
    /// visible. When unset the flag is ignored entirely.
    pub clade_defining_only: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            min_frequency: 0.0,
            max_frequency: None,
            clade_defining_only: false,
        }
    }
}

impl FilterSettings {
    pub fn is_visible(&self, record: &MutationRecord) -> bool {
        if record.frequency < self.min_frequency {
            return false;
        }
        if let Some(max) = self.max_frequency {
            if record.frequency > max {
                return false;
            }
        }
        !self.clade_defining_only || record.clade_defining
    }

    /// Hide every cell the settings exclude. Hiding only ever adds:
    /// applying two filters in sequence is equivalent to their AND, in
    /// either order.
    pub fn apply(&self, grid: &mut MutationGrid) {
        for row in grid.rows_mut() {
            for cell in row.cells.iter_mut().flatten() {
                if !self.is_visible(&cell.record) {
                    cell.hidden = true;
                }
            }
        }
    }
}

/// Sorted unique frequencies among the grid's visible cells; the values
/// the rendering layer marks on the frequency slider.
pub fn frequency_steps(grid: &MutationGrid) -> Vec<f64> {
    let mut steps: Vec<f64> = grid
        .visible_cells()
        .map(|cell| cell.record.frequency)
        .collect();
    steps.sort_unstable_by(f64::total_cmp);
    steps.dedup();
    steps
}
