//! Coordinate-alignment and filtering engine for viral lineage mutation
//! grids: per-strain mutation lists in, a consistent strains × aligned
//! genome positions grid plus histogram bins, gene boundaries, and
//! viewport-position mapping out. Rendering, variant calling, and file
//! plumbing live elsewhere.

use genome_annotation::GenomeAnnotation;
use lazy_static::lazy_static;

pub mod alignment;
pub mod error;
pub mod filter;
pub mod functions;
pub mod genome_annotation;
pub mod histogram;
pub mod mutation;
pub mod report;
pub mod store;
pub mod strain;
pub mod viewport;

lazy_static! {
    /// Bundled SARS-CoV-2 (MN908947.3) reference annotation.
    pub static ref SARS_COV_2: GenomeAnnotation = GenomeAnnotation::from_json_str(
        include_str!("../assets/gene_positions.json")
    )
    .expect("Invalid bundled gene positions JSON");
}
