//! Maps a scrollable pixel viewport over the rendered grid back to
//! genome coordinates, so the position indicator under the histogram can
//! be sized from two numbers.
//!
//! The rendering layer owns scroll/resize event wiring and calls
//! [`ViewportMapper::map`] on every tick; nothing here touches a DOM.

use crate::alignment::AlignedAxis;
use crate::histogram::genomic_extent;
use serde::Serialize;

/// The genome range currently visible, plus indicator margins expressed
/// as percentages of the shared genomic extent (see
/// [`genomic_extent`](crate::histogram::genomic_extent)).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewportWindow {
    pub left_index: usize,
    pub right_index: usize,
    pub left_nt: u32,
    pub right_nt: u32,
    /// Distance from the genome's left edge to `left_nt`, in percent.
    pub left_margin_pct: f64,
    /// Distance from `right_nt` to the genome's right edge, in percent.
    pub right_margin_pct: f64,
}

#[derive(Debug, Clone)]
enum ViewportState {
    /// No axis loaded yet; mapping yields nothing.
    Uninitialized,
    Ready { positions: Vec<u32>, extent: u32 },
}

#[derive(Debug, Clone)]
pub struct ViewportMapper {
    state: ViewportState,
}

impl Default for ViewportMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportMapper {
    pub fn new() -> Self {
        ViewportMapper {
            state: ViewportState::Uninitialized,
        }
    }

    /// Install a freshly aligned axis. Called after every strain-set
    /// change; an empty axis drops back to the uninitialized state so
    /// callers never see a partial result.
    pub fn set_axis(&mut self, axis: &AlignedAxis) {
        self.state = match genomic_extent(axis) {
            Some(extent) => ViewportState::Ready {
                positions: axis.positions().to_vec(),
                extent,
            },
            None => ViewportState::Uninitialized,
        };
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ViewportState::Ready { .. })
    }

    /// Translate the visible pixel window into genome coordinates.
    /// `view_left_px` is the scroll offset of the window within the full
    /// rendered grid; cells are `cell_width_px` wide. A negative left
    /// edge (left padding in the rendered surface) clamps to the first
    /// axis index; the right edge clamps to the last.
    pub fn map(
        &self,
        view_left_px: f64,
        view_width_px: f64,
        cell_width_px: f64,
    ) -> Option<ViewportWindow> {
        let ViewportState::Ready { positions, extent } = &self.state else {
            return None;
        };
        if cell_width_px <= 0.0 || view_width_px <= 0.0 {
            return None;
        }

        let last = positions.len() - 1;
        let left_index = ((view_left_px / cell_width_px).floor().max(0.0) as usize).min(last);
        let right_raw = ((view_left_px + view_width_px) / cell_width_px).ceil() as isize - 1;
        let right_index = right_raw.max(left_index as isize) as usize;
        let right_index = right_index.min(last);

        let left_nt = positions[left_index];
        let right_nt = positions[right_index];
        let extent = *extent as f64;
        Some(ViewportWindow {
            left_index,
            right_index,
            left_nt,
            right_nt,
            left_margin_pct: left_nt as f64 / extent * 100.0,
            right_margin_pct: (extent - right_nt as f64) / extent * 100.0,
        })
    }
}
