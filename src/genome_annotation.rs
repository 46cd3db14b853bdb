//! Reference genome annotation: maps nucleotide positions to genes,
//! amino-acid positions, and display labels.

use crate::error::VizError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
struct RegionEntry {
    start: u32,
    end: u32,
    #[serde(default = "default_coding")]
    coding: bool,
}

fn default_coding() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct GenePositionsFile {
    genome_length: u32,
    regions: HashMap<String, RegionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Protein-coding gene; positions inside get amino-acid numbering.
    Coding,
    /// Named non-coding region, e.g. a UTR. Labelled by name alone.
    Noncoding,
    /// Gap between named regions. The region name is the anchor gene:
    /// the nearest downstream one, or the nearest upstream one for a
    /// gap past the last named region.
    Intergenic { anchor_is_downstream: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenomeRegion {
    pub name: String,
    /// 1-based, inclusive.
    pub start: u32,
    pub end: u32,
    pub kind: RegionKind,
}

/// What a single nucleotide position resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionResolution {
    /// Coding gene containing the position, if any.
    pub gene: Option<String>,
    /// 1-based amino-acid position within `gene`, if coding.
    pub amino_acid_position: Option<u32>,
    /// Display label. Coding: `"{gene}.{aa}"`. Named non-coding: the
    /// region name. Intergenic: `"{downstream_gene}.1-{nt upstream}"`,
    /// or `"{upstream_gene}.-{nt downstream}"` past the last region.
    pub label: String,
}

/// Ordered, non-overlapping regions partitioning `1..=genome_length`.
/// Gaps in the input gene table are filled with intergenic regions at
/// construction time.
#[derive(Debug, Clone)]
pub struct GenomeAnnotation {
    regions: Vec<GenomeRegion>,
    genome_length: u32,
}

impl GenomeAnnotation {
    pub fn from_json_str(text: &str) -> Result<Self, VizError> {
        let file: GenePositionsFile = serde_json::from_str(text)?;
        let mut named: Vec<(String, RegionEntry)> = file.regions.into_iter().collect();
        named.sort_by_key(|(_, entry)| entry.start);

        if named.is_empty() {
            return Err(VizError::InvalidAnnotation(
                "gene table contains no regions".to_string(),
            ));
        }
        if file.genome_length == 0 {
            return Err(VizError::InvalidAnnotation(
                "genome length must be at least 1".to_string(),
            ));
        }

        let mut regions = Vec::with_capacity(named.len() * 2);
        let mut cursor = 1u32;
        for (name, entry) in &named {
            if entry.start == 0 || entry.end < entry.start || entry.end > file.genome_length {
                return Err(VizError::InvalidAnnotation(format!(
                    "region '{name}' has invalid range {}..={}",
                    entry.start, entry.end
                )));
            }
            if entry.start < cursor {
                return Err(VizError::InvalidAnnotation(format!(
                    "region '{name}' overlaps the previous region"
                )));
            }
            if entry.start > cursor {
                // Gap before a named region, anchored downstream.
                regions.push(GenomeRegion {
                    name: name.clone(),
                    start: cursor,
                    end: entry.start - 1,
                    kind: RegionKind::Intergenic {
                        anchor_is_downstream: true,
                    },
                });
            }
            regions.push(GenomeRegion {
                name: name.clone(),
                start: entry.start,
                end: entry.end,
                kind: if entry.coding {
                    RegionKind::Coding
                } else {
                    RegionKind::Noncoding
                },
            });
            cursor = entry.end + 1;
        }
        if cursor <= file.genome_length {
            // Trailing gap past the last named region, anchored upstream.
            let last_name = named.last().map(|(name, _)| name.clone()).unwrap_or_default();
            regions.push(GenomeRegion {
                name: last_name,
                start: cursor,
                end: file.genome_length,
                kind: RegionKind::Intergenic {
                    anchor_is_downstream: false,
                },
            });
        }

        Ok(Self {
            regions,
            genome_length: file.genome_length,
        })
    }

    pub fn from_json_file(path: &str) -> Result<Self, VizError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn genome_length(&self) -> u32 {
        self.genome_length
    }

    /// The full partition, intergenic fill included. Used by the
    /// rendering layer to draw the gene bar.
    pub fn regions(&self) -> &[GenomeRegion] {
        &self.regions
    }

    pub fn region_at(&self, nt_position: u32) -> Result<&GenomeRegion, VizError> {
        if nt_position < 1 || nt_position > self.genome_length {
            return Err(VizError::OutOfBounds {
                position: nt_position,
                genome_length: self.genome_length,
            });
        }
        // Regions partition the genome, so the last region starting at
        // or before the position contains it.
        let idx = self
            .regions
            .partition_point(|region| region.start <= nt_position);
        Ok(&self.regions[idx - 1])
    }

    pub fn resolve(&self, nt_position: u32) -> Result<PositionResolution, VizError> {
        let region = self.region_at(nt_position)?;
        let resolution = match region.kind {
            RegionKind::Coding => {
                let aa = (nt_position - region.start) / 3 + 1;
                PositionResolution {
                    gene: Some(region.name.clone()),
                    amino_acid_position: Some(aa),
                    label: format!("{}.{}", region.name, aa),
                }
            }
            RegionKind::Noncoding => PositionResolution {
                gene: None,
                amino_acid_position: None,
                label: region.name.clone(),
            },
            RegionKind::Intergenic {
                anchor_is_downstream: true,
            } => {
                let offset = region.end + 1 - nt_position;
                PositionResolution {
                    gene: None,
                    amino_acid_position: None,
                    label: format!("{}.1-{}", region.name, offset),
                }
            }
            RegionKind::Intergenic {
                anchor_is_downstream: false,
            } => {
                let offset = nt_position - (region.start - 1);
                PositionResolution {
                    gene: None,
                    amino_acid_position: None,
                    label: format!("{}.-{}", region.name, offset),
                }
            }
        };
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SARS_COV_2;

    #[test]
    fn partition_has_no_gaps_or_overlaps() {
        let mut expected_start = 1;
        for region in SARS_COV_2.regions() {
            assert_eq!(region.start, expected_start, "gap before {}", region.name);
            expected_start = region.end + 1;
        }
        assert_eq!(expected_start, SARS_COV_2.genome_length() + 1);
    }

    #[test]
    fn resolves_first_codon_of_spike() {
        let res = SARS_COV_2.resolve(21563).unwrap();
        assert_eq!(res.gene.as_deref(), Some("S"));
        assert_eq!(res.amino_acid_position, Some(1));
        assert_eq!(res.label, "S.1");
    }

    #[test]
    fn resolves_last_codon_of_spike() {
        let res = SARS_COV_2.resolve(25384).unwrap();
        assert_eq!(res.label, "S.1274");
    }

    #[test]
    fn resolves_intergenic_upstream_of_spike() {
        // 21562 sits in the ORF1ab/S gap, one nt upstream of S.
        let res = SARS_COV_2.resolve(21562).unwrap();
        assert_eq!(res.gene, None);
        assert_eq!(res.amino_acid_position, None);
        assert_eq!(res.label, "S.1-1");
    }

    #[test]
    fn resolves_utr_by_name() {
        let res = SARS_COV_2.resolve(100).unwrap();
        assert_eq!(res.gene, None);
        assert_eq!(res.amino_acid_position, None);
        assert_eq!(res.label, "5'UTR");
    }

    #[test]
    fn rejects_out_of_bounds_positions() {
        assert!(matches!(
            SARS_COV_2.resolve(0),
            Err(VizError::OutOfBounds { .. })
        ));
        assert!(matches!(
            SARS_COV_2.resolve(29904),
            Err(VizError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn trailing_gap_uses_upstream_anchor() {
        let json = r#"{
            "genome_length": 1000,
            "regions": {
                "A": { "start": 10, "end": 309, "coding": true }
            }
        }"#;
        let annotation = GenomeAnnotation::from_json_str(json).unwrap();

        // Leading gap anchors downstream to A.
        let res = annotation.resolve(9).unwrap();
        assert_eq!(res.label, "A.1-1");

        // Trailing gap anchors upstream to A with a negative offset.
        let res = annotation.resolve(310).unwrap();
        assert_eq!(res.label, "A.-1");
        let res = annotation.resolve(1000).unwrap();
        assert_eq!(res.label, "A.-691");
    }

    #[test]
    fn rejects_overlapping_regions() {
        let json = r#"{
            "genome_length": 100,
            "regions": {
                "A": { "start": 1, "end": 50 },
                "B": { "start": 40, "end": 80 }
            }
        }"#;
        assert!(matches!(
            GenomeAnnotation::from_json_str(json),
            Err(VizError::InvalidAnnotation(_))
        ));
    }
}
