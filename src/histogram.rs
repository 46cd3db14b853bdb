//! Fixed-width binning of visible mutations along the aligned axis.

use crate::alignment::{AlignedAxis, MutationGrid};
use serde::Serialize;

/// Histogram bin width in nucleotides.
pub const BIN_WIDTH: u32 = 100;

/// One bin covering nucleotide positions `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBin {
    pub start: u32,
    pub end: u32,
    /// Visible cells across all strains whose position falls in range.
    /// Shared positions count once per strain.
    pub count: usize,
}

/// Upper edge of the binned range: the max aligned position rounded up
/// to the next bin boundary. The viewport mapper normalizes against the
/// same value so both stay referenced to one genomic extent. Computed
/// from the axis, not the filtered cells, so it is stable while the
/// frequency slider moves.
pub fn genomic_extent(axis: &AlignedAxis) -> Option<u32> {
    axis.max_position()
        .map(|max| max.div_ceil(BIN_WIDTH) * BIN_WIDTH)
}

/// Bin the grid's visible cells into [`BIN_WIDTH`]-nt windows from
/// position 1 up to the genomic extent. Interior bins with no mutations
/// are included with a zero count.
pub fn histogram(grid: &MutationGrid) -> Vec<HistogramBin> {
    let Some(extent) = genomic_extent(grid.axis()) else {
        return Vec::new();
    };
    let num_bins = (extent / BIN_WIDTH) as usize;
    let mut counts = vec![0usize; num_bins];
    for cell in grid.visible_cells() {
        let bin = ((cell.record.nt_position - 1) / BIN_WIDTH) as usize;
        counts[bin] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: i as u32 * BIN_WIDTH + 1,
            end: (i as u32 + 1) * BIN_WIDTH,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SARS_COV_2;
    use crate::filter::FilterSettings;
    use crate::mutation::{MutationKind, RawMutation};
    use crate::strain::{Strain, VariantStatus};

    fn raw(nt_position: u32, frequency: f64) -> RawMutation {
        RawMutation {
            nt_position,
            kind: MutationKind::Substitution {
                reference: "A".to_string(),
                alternate: "T".to_string(),
            },
            name: None,
            amino_acid_position: None,
            frequency,
            clade_defining: false,
            functions: vec![],
        }
    }

    fn strain(name: &str, positions: &[u32]) -> Strain {
        let raws = positions.iter().map(|&p| raw(p, 0.5)).collect();
        Strain::from_raw_batch(name, 10, VariantStatus::None, raws, &SARS_COV_2)
            .unwrap()
            .0
    }

    #[test]
    fn bins_cover_the_extent_with_fixed_width() {
        let a = strain("A", &[1, 100, 101, 450]);
        let grid = MutationGrid::build(&[&a]);
        let bins = histogram(&grid);
        assert_eq!(bins.len(), 5);
        assert_eq!((bins[0].start, bins[0].end, bins[0].count), (1, 100, 2));
        assert_eq!((bins[1].start, bins[1].end, bins[1].count), (101, 200, 1));
        assert_eq!(bins[2].count, 0);
        assert_eq!((bins[4].start, bins[4].end, bins[4].count), (401, 500, 1));
    }

    #[test]
    fn shared_positions_count_once_per_strain() {
        let a = strain("A", &[150]);
        let b = strain("B", &[150]);
        let grid = MutationGrid::build(&[&a, &b]);
        let bins = histogram(&grid);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn bin_counts_sum_to_visible_cells() {
        let a = strain("A", &[100, 500, 900, 2500]);
        let b = strain("B", &[500, 900, 12000]);
        let mut grid = MutationGrid::build(&[&a, &b]);
        FilterSettings {
            min_frequency: 0.5,
            ..Default::default()
        }
        .apply(&mut grid);

        let total: usize = histogram(&grid).iter().map(|bin| bin.count).sum();
        assert_eq!(total, grid.visible_cells().count());
        assert_eq!(total, 7);
    }

    #[test]
    fn extent_rounds_up_to_bin_boundary() {
        let a = strain("A", &[29651]);
        let axis = crate::alignment::AlignedAxis::from_strains(std::iter::once(&a));
        assert_eq!(genomic_extent(&axis), Some(29700));

        let b = strain("B", &[29700]);
        let axis = crate::alignment::AlignedAxis::from_strains(std::iter::once(&b));
        assert_eq!(genomic_extent(&axis), Some(29700));
    }

    #[test]
    fn empty_grid_yields_no_bins() {
        let grid = MutationGrid::build(&[]);
        assert!(histogram(&grid).is_empty());
        assert_eq!(genomic_extent(grid.axis()), None);
    }

    #[test]
    fn hidden_cells_do_not_count_but_keep_the_extent() {
        let raws = vec![raw(150, 0.1), raw(950, 0.9)];
        let (a, _) =
            Strain::from_raw_batch("A", 10, VariantStatus::None, raws, &SARS_COV_2).unwrap();
        let mut grid = MutationGrid::build(&[&a]);
        FilterSettings {
            min_frequency: 0.5,
            ..Default::default()
        }
        .apply(&mut grid);

        let bins = histogram(&grid);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[1].count, 0);
        assert_eq!(bins[9].count, 1);
    }
}
