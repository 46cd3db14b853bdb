//! Mutation records: the raw per-strain input shape delivered by the
//! variant-calling pipeline, and the validated record used everywhere else.

use crate::error::VizError;
use crate::genome_annotation::GenomeAnnotation;
use serde::{Deserialize, Serialize};

/// A literature-curated functional effect attached to a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalAnnotation {
    pub description: String,
    pub citation: String,
}

/// What kind of change a record describes. Required fields are explicit
/// per variant; there is no catch-all shape with nullable everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationKind {
    Substitution { reference: String, alternate: String },
    Insertion { alternate: String },
    /// Deleted range is `nt_position..=end_position` on the reference.
    Deletion { end_position: u32 },
}

/// Field-less discriminant of [`MutationKind`], used as a lookup key by
/// the functional-annotation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationClass {
    Substitution,
    Insertion,
    Deletion,
}

impl MutationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationClass::Substitution => "substitution",
            MutationClass::Insertion => "insertion",
            MutationClass::Deletion => "deletion",
        }
    }
}

impl MutationKind {
    pub fn class(&self) -> MutationClass {
        match self {
            MutationKind::Substitution { .. } => MutationClass::Substitution,
            MutationKind::Insertion { .. } => MutationClass::Insertion,
            MutationKind::Deletion { .. } => MutationClass::Deletion,
        }
    }
}

/// One mutation as delivered by the external pipeline, prior to
/// validation. `amino_acid_position` is the pipeline's own claim, checked
/// against the annotation-derived value during validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMutation {
    pub nt_position: u32,
    #[serde(flatten)]
    pub kind: MutationKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amino_acid_position: Option<u32>,
    pub frequency: f64,
    #[serde(default)]
    pub clade_defining: bool,
    #[serde(default)]
    pub functions: Vec<FunctionalAnnotation>,
}

/// A validated mutation with its genome context resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub nt_position: u32,
    pub kind: MutationKind,
    /// Protein-level name from the pipeline, e.g. `"S.D614G"`.
    pub name: Option<String>,
    /// Coding gene at `nt_position`, or `None` when intergenic.
    pub gene: Option<String>,
    /// Set iff the position falls in a coding region.
    pub amino_acid_position: Option<u32>,
    /// Display label from [`GenomeAnnotation::resolve`].
    pub label: String,
    /// Alternate-allele frequency in `[0, 1]`.
    pub frequency: f64,
    pub clade_defining: bool,
    pub functions: Vec<FunctionalAnnotation>,
}

impl MutationRecord {
    /// Validate a raw record against the annotation. Rejections carry a
    /// human-readable reason; the batch loader keeps going past them.
    pub fn from_raw(raw: RawMutation, annotation: &GenomeAnnotation) -> Result<Self, VizError> {
        if !raw.frequency.is_finite() || !(0.0..=1.0).contains(&raw.frequency) {
            return Err(VizError::MalformedRecord {
                detail: format!(
                    "frequency {} at position {} is not in [0, 1]",
                    raw.frequency, raw.nt_position
                ),
            });
        }
        match &raw.kind {
            MutationKind::Substitution {
                reference,
                alternate,
            } => {
                if reference.is_empty() || alternate.is_empty() {
                    return Err(VizError::MalformedRecord {
                        detail: format!(
                            "substitution at position {} with empty sequence",
                            raw.nt_position
                        ),
                    });
                }
            }
            MutationKind::Insertion { alternate } => {
                if alternate.is_empty() {
                    return Err(VizError::MalformedRecord {
                        detail: format!(
                            "insertion at position {} with empty sequence",
                            raw.nt_position
                        ),
                    });
                }
            }
            MutationKind::Deletion { end_position } => {
                if *end_position < raw.nt_position {
                    return Err(VizError::MalformedRecord {
                        detail: format!(
                            "deletion range {}..={} is inverted",
                            raw.nt_position, end_position
                        ),
                    });
                }
                // The whole deleted range must lie on the reference.
                annotation.region_at(*end_position)?;
            }
        }

        let resolution = annotation.resolve(raw.nt_position)?;
        if raw.amino_acid_position.is_some()
            && raw.amino_acid_position != resolution.amino_acid_position
        {
            return Err(VizError::MalformedRecord {
                detail: format!(
                    "claimed amino-acid position {:?} at nt {} contradicts annotation ({:?})",
                    raw.amino_acid_position, raw.nt_position, resolution.amino_acid_position
                ),
            });
        }

        Ok(MutationRecord {
            nt_position: raw.nt_position,
            kind: raw.kind,
            name: raw.name,
            gene: resolution.gene,
            amino_acid_position: resolution.amino_acid_position,
            label: resolution.label,
            frequency: raw.frequency,
            clade_defining: raw.clade_defining,
            functions: raw.functions,
        })
    }
}
