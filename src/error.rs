use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum VizError {
    /// Nucleotide position outside the reference genome extent.
    OutOfBounds { position: u32, genome_length: u32 },
    /// A mutation record that cannot be accepted as-is.
    MalformedRecord { detail: String },
    /// An operation referenced a strain that is not loaded.
    UnknownStrain(String),
    /// The genome annotation table itself is unusable.
    InvalidAnnotation(String),
    Io(std::io::Error),
    Serde(serde_json::Error),
    Csv(csv::Error),
}

impl Error for VizError {}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VizError::OutOfBounds {
                position,
                genome_length,
            } => write!(
                f,
                "Nucleotide position {position} is outside the genome (1..={genome_length})"
            ),
            VizError::MalformedRecord { detail } => {
                write!(f, "Malformed mutation record: {detail}")
            }
            VizError::UnknownStrain(name) => write!(f, "Unknown strain '{name}'"),
            VizError::InvalidAnnotation(detail) => {
                write!(f, "Invalid genome annotation: {detail}")
            }
            VizError::Io(err) => write!(f, "{err}"),
            VizError::Serde(err) => write!(f, "{err}"),
            VizError::Csv(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::Io(err)
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Serde(err)
    }
}

impl From<csv::Error> for VizError {
    fn from(err: csv::Error) -> Self {
        VizError::Csv(err)
    }
}
