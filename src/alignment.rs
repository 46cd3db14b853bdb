//! Position alignment: the shared coordinate axis across strains and the
//! 2-D mutation grid laid out on it.

use crate::error::VizError;
use crate::genome_annotation::GenomeAnnotation;
use crate::mutation::MutationRecord;
use crate::strain::{Strain, VariantStatus};
use itertools::Itertools;
use serde::Serialize;

/// The union of all mutated nucleotide positions across the included
/// strains, sorted ascending. Strictly increasing by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignedAxis {
    positions: Vec<u32>,
}

impl AlignedAxis {
    /// O(M log M) in the total mutation count M: collect, sort, dedup.
    /// The same strain set always yields the same axis.
    pub fn from_strains<'a>(strains: impl IntoIterator<Item = &'a Strain>) -> Self {
        let mut positions: Vec<u32> = strains
            .into_iter()
            .flat_map(|strain| strain.mutations().iter().map(|m| m.nt_position))
            .collect();
        positions.sort_unstable();
        positions.dedup();
        AlignedAxis { positions }
    }

    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn index_of(&self, nt_position: u32) -> Option<usize> {
        self.positions.binary_search(&nt_position).ok()
    }

    pub fn max_position(&self) -> Option<u32> {
        self.positions.last().copied()
    }

    /// Contiguous runs of axis positions sharing a resolved label region,
    /// in axis order. Feeds the gene bar above the rendered grid.
    pub fn gene_segments(
        &self,
        annotation: &GenomeAnnotation,
    ) -> Result<Vec<GeneSegment>, VizError> {
        let mut regions = Vec::with_capacity(self.positions.len());
        for &pos in &self.positions {
            let region = annotation.region_at(pos)?;
            regions.push((region.start, region.name.clone()));
        }
        let mut segments = Vec::new();
        let mut index = 0;
        // Group by region identity (start), not name: an intergenic gap
        // shares its anchor gene's name but is a distinct segment.
        for (_, group) in &regions.iter().chunk_by(|(start, _)| *start) {
            let group: Vec<_> = group.collect();
            segments.push(GeneSegment {
                name: group[0].1.clone(),
                start_index: index,
                end_index: index + group.len() - 1,
            });
            index += group.len();
        }
        Ok(segments)
    }
}

/// A run of adjacent axis indices falling in the same annotation region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneSegment {
    pub name: String,
    pub start_index: usize,
    pub end_index: usize,
}

/// One grid cell: a mutation present in a strain at an aligned position.
/// `hidden` is flipped by the filter engine; the cell stays in place so
/// the axis and row geometry never change under filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub record: MutationRecord,
    pub hidden: bool,
}

/// One strain's row across the full aligned axis. `cells[i]` corresponds
/// to `axis.positions()[i]`; `None` means the strain has no mutation
/// there, which is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub strain: String,
    pub sample_size: u32,
    pub status: VariantStatus,
    pub cells: Vec<Option<GridCell>>,
}

impl GridRow {
    pub fn visible_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| !cell.hidden)
    }
}

/// The render-ready grid: strains × aligned positions.
#[derive(Debug, Clone, Serialize)]
pub struct MutationGrid {
    axis: AlignedAxis,
    rows: Vec<GridRow>,
}

impl MutationGrid {
    /// Lay the strains out on the axis computed from them. Records are
    /// placed in input order, so a duplicate position within a strain
    /// deterministically overwrites the earlier entry (last-seen wins).
    pub fn build(strains: &[&Strain]) -> Self {
        let axis = AlignedAxis::from_strains(strains.iter().copied());
        let rows = strains
            .iter()
            .map(|strain| {
                let mut cells: Vec<Option<GridCell>> = vec![None; axis.len()];
                for record in strain.mutations() {
                    if let Some(index) = axis.index_of(record.nt_position) {
                        cells[index] = Some(GridCell {
                            record: record.clone(),
                            hidden: false,
                        });
                    }
                }
                GridRow {
                    strain: strain.name().to_string(),
                    sample_size: strain.sample_size(),
                    status: strain.status(),
                    cells,
                }
            })
            .collect();
        MutationGrid { axis, rows }
    }

    pub fn axis(&self) -> &AlignedAxis {
        &self.axis
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [GridRow] {
        &mut self.rows
    }

    pub fn row(&self, strain: &str) -> Option<&GridRow> {
        self.rows.iter().find(|row| row.strain == strain)
    }

    /// All non-hidden cells across all rows.
    pub fn visible_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|row| row.visible_cells())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SARS_COV_2;
    use crate::mutation::{MutationKind, RawMutation};

    fn substitution(nt_position: u32, frequency: f64) -> RawMutation {
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
        let raws = positions.iter().map(|&p| substitution(p, 0.5)).collect();
        Strain::from_raw_batch(name, 10, VariantStatus::None, raws, &SARS_COV_2)
            .unwrap()
            .0
    }

    #[test]
    fn axis_is_union_of_strain_positions() {
        let a = strain("A", &[100, 500]);
        let b = strain("B", &[500, 900]);
        let axis = AlignedAxis::from_strains([&a, &b]);
        assert_eq!(axis.positions(), &[100, 500, 900]);
    }

    #[test]
    fn axis_is_strictly_increasing() {
        let a = strain("A", &[900, 100, 500, 100]);
        let axis = AlignedAxis::from_strains(std::iter::once(&a));
        for pair in axis.positions().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn realignment_is_idempotent() {
        let a = strain("A", &[100, 500]);
        let b = strain("B", &[500, 900]);
        let first = AlignedAxis::from_strains([&a, &b]);
        let second = AlignedAxis::from_strains([&a, &b]);
        assert_eq!(first, second);
    }

    #[test]
    fn removing_a_strain_drops_its_private_positions() {
        let a = strain("A", &[100, 500]);
        let b = strain("B", &[500, 900]);
        let full = AlignedAxis::from_strains([&a, &b]);
        assert_eq!(full.positions(), &[100, 500, 900]);

        let without_a = AlignedAxis::from_strains(std::iter::once(&b));
        assert_eq!(without_a.positions(), &[500, 900]);
    }

    #[test]
    fn grid_cells_are_empty_where_a_strain_has_no_mutation() {
        let a = strain("A", &[100, 500]);
        let b = strain("B", &[500, 900]);
        let grid = MutationGrid::build(&[&a, &b]);

        let row_a = grid.row("A").unwrap();
        let row_b = grid.row("B").unwrap();
        assert!(row_a.cells[0].is_some()); // 100
        assert!(row_a.cells[1].is_some()); // 500
        assert!(row_a.cells[2].is_none()); // 900
        assert!(row_b.cells[0].is_none()); // 100
        assert!(row_b.cells[1].is_some()); // 500
        assert!(row_b.cells[2].is_some()); // 900
    }

    #[test]
    fn duplicate_position_within_a_strain_keeps_last_entry() {
        let raws = vec![substitution(500, 0.2), substitution(500, 0.8)];
        let (dup, _) =
            Strain::from_raw_batch("DUP", 10, VariantStatus::None, raws, &SARS_COV_2).unwrap();
        let grid = MutationGrid::build(&[&dup]);
        let cell = grid.row("DUP").unwrap().cells[0].as_ref().unwrap();
        assert_eq!(cell.record.frequency, 0.8);
    }

    #[test]
    fn gene_segments_group_adjacent_positions_by_region() {
        // Two positions in ORF1ab, one in the ORF1ab/S gap, two in S.
        let a = strain("A", &[266, 270, 21560, 21563, 25000]);
        let axis = AlignedAxis::from_strains(std::iter::once(&a));
        let segments = axis.gene_segments(&SARS_COV_2).unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].name, "ORF1ab");
        assert_eq!((segments[0].start_index, segments[0].end_index), (0, 1));
        // The gap region is anchored to S, then S itself follows.
        assert_eq!(segments[1].name, "S");
        assert_eq!((segments[1].start_index, segments[1].end_index), (2, 2));
        assert_eq!(segments[2].name, "S");
        assert_eq!((segments[2].start_index, segments[2].end_index), (3, 4));
    }
}
