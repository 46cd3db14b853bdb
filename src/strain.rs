//! A strain (viral lineage) and batch loading of its mutation list.

use crate::error::VizError;
use crate::genome_annotation::GenomeAnnotation;
use crate::mutation::{MutationRecord, RawMutation};
use serde::{Deserialize, Serialize};

/// WHO-style display-priority flag. A strain is a variant of concern,
/// a variant of interest, or neither; never both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantStatus {
    #[default]
    None,
    OfConcern,
    OfInterest,
}

/// A raw record the batch loader refused, with the reason.
#[derive(Debug, Clone)]
pub struct RejectedMutation {
    pub raw: RawMutation,
    pub reason: String,
}

/// Outcome of loading one strain's batch: the batch loads even when some
/// records are rejected.
#[derive(Debug, Clone)]
pub struct StrainLoadReport {
    pub strain: String,
    pub accepted: usize,
    pub rejected: Vec<RejectedMutation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strain {
    name: String,
    /// Number of samples the mutation calls were derived from.
    sample_size: u32,
    status: VariantStatus,
    /// Input order is preserved; later duplicates of a position win when
    /// the grid is built.
    mutations: Vec<MutationRecord>,
}

impl Strain {
    /// Validate a raw batch into a strain. Malformed records are dropped
    /// and reported; everything else loads.
    pub fn from_raw_batch(
        name: &str,
        sample_size: u32,
        status: VariantStatus,
        raws: Vec<RawMutation>,
        annotation: &GenomeAnnotation,
    ) -> Result<(Self, StrainLoadReport), VizError> {
        if name.is_empty() {
            return Err(VizError::MalformedRecord {
                detail: "strain name must not be empty".to_string(),
            });
        }
        if sample_size == 0 {
            return Err(VizError::MalformedRecord {
                detail: format!("strain '{name}' has sample size 0"),
            });
        }

        let mut mutations = Vec::with_capacity(raws.len());
        let mut rejected = Vec::new();
        for raw in raws {
            match MutationRecord::from_raw(raw.clone(), annotation) {
                Ok(record) => mutations.push(record),
                Err(err) => rejected.push(RejectedMutation {
                    raw,
                    reason: err.to_string(),
                }),
            }
        }

        let report = StrainLoadReport {
            strain: name.to_string(),
            accepted: mutations.len(),
            rejected,
        };
        let strain = Strain {
            name: name.to_string(),
            sample_size,
            status,
            mutations,
        };
        Ok((strain, report))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn status(&self) -> VariantStatus {
        self.status
    }

    pub fn mutations(&self) -> &[MutationRecord] {
        &self.mutations
    }

    pub(crate) fn mutations_mut(&mut self) -> &mut [MutationRecord] {
        &mut self.mutations
    }
}
