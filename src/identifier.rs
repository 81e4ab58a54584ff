/// `info:doi:` URI for a DOI. No validation is done on `doi`.
pub fn info_uri(doi: &str) -> String {
    format!("info:doi:{doi}")
}
