//! Downloadable per-strain summary reports over the filtered grid.

use crate::alignment::MutationGrid;
use crate::error::VizError;
use crate::mutation::MutationKind;
use std::io;

const HEADER: [&str; 7] = [
    "nt_position",
    "label",
    "name",
    "kind",
    "change",
    "frequency",
    "functions",
];

fn format_change(nt_position: u32, kind: &MutationKind) -> String {
    match kind {
        MutationKind::Substitution {
            reference,
            alternate,
        } => format!("{reference}>{alternate}"),
        MutationKind::Insertion { alternate } => format!("ins:{alternate}"),
        MutationKind::Deletion { end_position } => {
            format!("del:{nt_position}-{end_position}")
        }
    }
}

/// Write one strain's visible cells as a tab-separated summary. Hidden
/// cells are omitted; an all-hidden strain yields a header-only report.
pub fn write_strain_summary<W: io::Write>(
    grid: &MutationGrid,
    strain: &str,
    writer: W,
) -> Result<(), VizError> {
    let row = grid
        .row(strain)
        .ok_or_else(|| VizError::UnknownStrain(strain.to_string()))?;

    let mut tsv = csv::WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    tsv.write_record(HEADER)?;
    for cell in row.visible_cells() {
        let record = &cell.record;
        let functions = record
            .functions
            .iter()
            .map(|f| f.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        tsv.write_record([
            record.nt_position.to_string(),
            record.label.clone(),
            record.name.clone().unwrap_or_default(),
            record.kind.class().as_str().to_string(),
            format_change(record.nt_position, &record.kind),
            record.frequency.to_string(),
            functions,
        ])?;
    }
    tsv.flush()?;
    Ok(())
}

/// Convenience wrapper returning the summary as a string.
pub fn strain_summary(grid: &MutationGrid, strain: &str) -> Result<String, VizError> {
    let mut buf = Vec::new();
    write_strain_summary(grid, strain, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
