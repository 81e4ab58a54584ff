use serde::{Deserialize, Serialize};

/// A citation as retrieved from the metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Citation {
    pub doi: String,
    /// Year the citation claims to have happened in, as recorded upstream.
    pub year: String,
}

/// One line of an output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRow {
    pub timestamp: String,
    pub doi: String,
    /// `info:doi:` form of `doi`
    pub uri: String,
    /// Identifier the translation service resolved `uri` to; empty when resolution was skipped.
    pub work_uri: String,
}
