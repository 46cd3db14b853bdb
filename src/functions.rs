//! Index of literature-curated functional annotations, keyed by
//! `(gene, amino-acid position, mutation class)`. The curation source
//! delivers a TSV; lookups enrich loaded mutation records in place.

use crate::error::VizError;
use crate::mutation::{FunctionalAnnotation, MutationClass, MutationRecord};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;

#[derive(Debug, Deserialize)]
struct FunctionRow {
    gene: String,
    amino_acid_position: u32,
    mutation_type: MutationClass,
    description: String,
    citation: String,
}

type FunctionKey = (String, u32, MutationClass);

#[derive(Debug, Clone, Default)]
pub struct FunctionIndex {
    map: HashMap<FunctionKey, Vec<FunctionalAnnotation>>,
}

impl FunctionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a tab-separated annotation table with a header row:
    /// `gene  amino_acid_position  mutation_type  description  citation`.
    pub fn from_tsv_reader<R: std::io::Read>(reader: R) -> Result<Self, VizError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(reader);
        let mut index = Self::new();
        for row in csv_reader.deserialize() {
            let row: FunctionRow = row?;
            index.insert(
                &row.gene,
                row.amino_acid_position,
                row.mutation_type,
                FunctionalAnnotation {
                    description: row.description,
                    citation: row.citation,
                },
            );
        }
        Ok(index)
    }

    pub fn from_tsv_str(text: &str) -> Result<Self, VizError> {
        Self::from_tsv_reader(text.as_bytes())
    }

    pub fn from_tsv_file(path: &str) -> Result<Self, VizError> {
        Self::from_tsv_reader(File::open(path)?)
    }

    pub fn insert(
        &mut self,
        gene: &str,
        amino_acid_position: u32,
        class: MutationClass,
        annotation: FunctionalAnnotation,
    ) {
        self.map
            .entry((gene.to_string(), amino_acid_position, class))
            .or_default()
            .push(annotation);
    }

    pub fn lookup(
        &self,
        gene: &str,
        amino_acid_position: u32,
        class: MutationClass,
    ) -> &[FunctionalAnnotation] {
        self.map
            .get(&(gene.to_string(), amino_acid_position, class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Append matching annotations to the record, skipping duplicates.
    /// Intergenic records have no lookup key and are left alone.
    pub fn annotate_record(&self, record: &mut MutationRecord) {
        let (Some(gene), Some(aa)) = (record.gene.clone(), record.amino_acid_position) else {
            return;
        };
        for annotation in self.lookup(&gene, aa, record.kind.class()) {
            if !record.functions.contains(annotation) {
                record.functions.push(annotation.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
