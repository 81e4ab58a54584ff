use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::FormatError;

/// Driver name shared by every file this tool reads or writes.
pub const FILE_PREFIX: &str = "CrossrefCitations";

/// `{out_dir}/CrossrefCitations_{date}.{extension}`. Does not touch the filesystem.
pub fn output_path(out_dir: impl AsRef<Path>, date: &str, extension: &str) -> PathBuf {
    out_dir
        .as_ref()
        .join(format!("{FILE_PREFIX}_{date}.{extension}"))
}

/// Recover the date from a path shaped like `{dir}/{driver}_{date}.{ext}`.
///
/// The base name (extension dropped) must split on `_` into exactly two parts, so a driver or
/// date containing an underscore is rejected.
pub fn date_from_path(path: impl AsRef<Path>) -> Result<String, FormatError> {
    let path = path.as_ref();
    let invalid = || FormatError::FileName(path.to_path_buf());

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;

    let mut parts = name.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_driver), Some(date), None) => Ok(date.to_string()),
        _ => Err(invalid()),
    }
}

/// What a staleness probe found at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileState {
    /// Exists with non-zero size.
    Usable,
    Empty,
    Missing,
    /// Metadata could not be read for any reason other than absence.
    Inaccessible(io::ErrorKind),
}

impl FileState {
    /// Never fails: every OS error is folded into a state.
    pub fn probe(path: impl AsRef<Path>) -> Self {
        match fs::metadata(path) {
            Ok(meta) if meta.len() > 0 => FileState::Usable,
            Ok(_) => FileState::Empty,
            Err(e) if e.kind() == io::ErrorKind::NotFound => FileState::Missing,
            Err(e) => FileState::Inaccessible(e.kind()),
        }
    }

    pub fn is_usable(self) -> bool {
        self == FileState::Usable
    }
}

/// Whether `path` already holds data worth keeping.
///
/// Missing, empty and unreadable files all count as not usable.
pub fn exists_and_not_empty(path: impl AsRef<Path>) -> bool {
    FileState::probe(path).is_usable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn output_path_layout() {
        assert_eq!(
            output_path("out", "2020-05-17", "csv"),
            PathBuf::from("out/CrossrefCitations_2020-05-17.csv")
        );
        assert_eq!(
            output_path("", "2020-05-17", "json"),
            PathBuf::from("CrossrefCitations_2020-05-17.json")
        );
    }

    #[test]
    fn date_round_trips_through_path() {
        proptest::proptest!(|(
            dir in "[A-Za-z0-9./-]{0,24}",
            date in "[0-9]{4}-[0-9]{2}-[0-9]{2}",
            ext in "[a-z]{1,5}",
        )| {
            let path = output_path(&dir, &date, &ext);
            proptest::prop_assert_eq!(date_from_path(&path).unwrap(), date);
        })
    }

    #[test]
    fn directory_underscores_are_ignored() {
        assert_eq!(
            date_from_path("/data/out_dir/CrossrefCitations_2020-05-17.csv").unwrap(),
            "2020-05-17"
        );
    }

    #[test]
    fn extension_is_optional() {
        assert_eq!(date_from_path("driver_2020-05-17").unwrap(), "2020-05-17");
    }

    #[test]
    fn rejects_wrong_underscore_count() {
        for bad in [
            "out/CrossrefCitations-2020-05-17.csv",
            "out/Crossref_Citations_2020-05-17.csv",
            "out/a_b_c_d.csv",
            "",
        ] {
            assert!(
                matches!(date_from_path(bad), Err(FormatError::FileName(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn probe_reports_each_state() {
        let dir = tempdir().expect("tmp dir");

        let missing = dir.path().join("missing.csv");
        assert_eq!(FileState::probe(&missing), FileState::Missing);
        assert!(!exists_and_not_empty(&missing));

        let empty = NamedTempFile::new_in(dir.path()).expect("tmp file");
        assert_eq!(FileState::probe(empty.path()), FileState::Empty);
        assert!(!exists_and_not_empty(empty.path()));

        let mut full = NamedTempFile::new_in(dir.path()).expect("tmp file");
        writeln!(full, "doi,year").unwrap();
        full.flush().unwrap();
        assert_eq!(FileState::probe(full.path()), FileState::Usable);
        assert!(exists_and_not_empty(full.path()));
    }

    #[test]
    fn probe_through_a_file_is_not_usable() {
        // A path "inside" a regular file fails with NotADirectory rather than NotFound.
        let file = NamedTempFile::new().expect("tmp file");
        let nested = file.path().join("child.csv");
        assert!(!FileState::probe(&nested).is_usable());
        assert!(!exists_and_not_empty(&nested));
    }
}
