//! The per-session mutation record store: owns the loaded strains, their
//! display order and visibility, and the lazily cached aligned axis.
//!
//! Single-writer, single-reader: one store per session, no internal
//! locking. Every mutating operation that changes the included strain
//! set invalidates the axis cache; recomputation happens on next read.

use crate::alignment::{AlignedAxis, MutationGrid};
use crate::error::VizError;
use crate::filter::FilterSettings;
use crate::functions::FunctionIndex;
use crate::genome_annotation::GenomeAnnotation;
use crate::mutation::RawMutation;
use crate::strain::{Strain, StrainLoadReport, VariantStatus};
use crate::SARS_COV_2;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct MutationStore {
    annotation: GenomeAnnotation,
    /// Display order.
    strains: Vec<Strain>,
    /// Loaded but excluded from the grid and axis.
    hidden: HashSet<String>,
    axis_cache: Option<AlignedAxis>,
}

impl MutationStore {
    pub fn new(annotation: GenomeAnnotation) -> Self {
        MutationStore {
            annotation,
            strains: Vec::new(),
            hidden: HashSet::new(),
            axis_cache: None,
        }
    }

    /// A store over the bundled SARS-CoV-2 reference annotation.
    pub fn sars_cov_2() -> Self {
        Self::new(SARS_COV_2.clone())
    }

    pub fn annotation(&self) -> &GenomeAnnotation {
        &self.annotation
    }

    /// Load or replace a strain from a raw pipeline batch. Replacement is
    /// atomic: the old strain is fully discarded, never merged, and the
    /// strain keeps its display position. Malformed records are reported
    /// in the returned load report while the rest of the batch loads.
    pub fn load_strain(
        &mut self,
        name: &str,
        sample_size: u32,
        status: VariantStatus,
        raws: Vec<RawMutation>,
    ) -> Result<StrainLoadReport, VizError> {
        let (strain, report) =
            Strain::from_raw_batch(name, sample_size, status, raws, &self.annotation)?;
        match self.strains.iter_mut().find(|s| s.name() == name) {
            Some(existing) => *existing = strain,
            None => self.strains.push(strain),
        }
        self.axis_cache = None;
        Ok(report)
    }

    /// Remove a strain. A missing name is a silent no-op; the return
    /// value says whether anything was removed.
    pub fn remove_strain(&mut self, name: &str) -> bool {
        let before = self.strains.len();
        self.strains.retain(|s| s.name() != name);
        self.hidden.remove(name);
        let removed = self.strains.len() != before;
        if removed {
            self.axis_cache = None;
        }
        removed
    }

    pub fn strain(&self, name: &str) -> Option<&Strain> {
        self.strains.iter().find(|s| s.name() == name)
    }

    /// All loaded strains in display order, hidden ones included.
    pub fn strains(&self) -> &[Strain] {
        &self.strains
    }

    /// Strains that participate in the grid, in display order.
    pub fn included_strains(&self) -> Vec<&Strain> {
        self.strains
            .iter()
            .filter(|s| !self.hidden.contains(s.name()))
            .collect()
    }

    /// Move the named strains to the front in the given order; strains
    /// not named keep their relative order behind them. Errors if any
    /// name is unknown. The included set is unchanged, so the cached
    /// axis stays valid.
    pub fn set_strain_order(&mut self, order: &[&str]) -> Result<(), VizError> {
        for name in order {
            if self.strain(name).is_none() {
                return Err(VizError::UnknownStrain(name.to_string()));
            }
        }
        let rank = |strain: &Strain| {
            order
                .iter()
                .position(|name| *name == strain.name())
                .unwrap_or(order.len())
        };
        self.strains.sort_by_key(rank);
        Ok(())
    }

    /// Exclude a strain from (or re-include it in) the grid without
    /// unloading it. Changing the included set invalidates the axis.
    pub fn set_strain_hidden(&mut self, name: &str, hidden: bool) -> Result<(), VizError> {
        if self.strain(name).is_none() {
            return Err(VizError::UnknownStrain(name.to_string()));
        }
        let changed = if hidden {
            self.hidden.insert(name.to_string())
        } else {
            self.hidden.remove(name)
        };
        if changed {
            self.axis_cache = None;
        }
        Ok(())
    }

    pub fn is_strain_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// The aligned axis over the included strains, recomputed lazily
    /// after any invalidating change.
    pub fn aligned_axis(&mut self) -> &AlignedAxis {
        if self.axis_cache.is_none() {
            let axis = AlignedAxis::from_strains(self.included_strains().into_iter());
            self.axis_cache = Some(axis);
        }
        match &self.axis_cache {
            Some(axis) => axis,
            None => unreachable!("axis cache filled above"),
        }
    }

    /// Build the filtered grid view over the included strains. The store
    /// itself is not modified by filtering.
    pub fn grid(&mut self, settings: &FilterSettings) -> MutationGrid {
        let mut grid = MutationGrid::build(&self.included_strains());
        self.axis_cache = Some(grid.axis().clone());
        settings.apply(&mut grid);
        grid
    }

    /// Enrich all loaded records in place from the external
    /// functional-annotation source. Positions are untouched, so the
    /// axis cache stays valid.
    pub fn annotate_functions(&mut self, index: &FunctionIndex) {
        for strain in &mut self.strains {
            for record in strain.mutations_mut() {
                index.annotate_record(record);
            }
        }
    }
}
