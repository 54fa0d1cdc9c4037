//! File reading. The only I/O in the crate: each file is read once, up
//! front, so the computational core stays pure and testable without a
//! filesystem.

use crate::core::{ScanError, ScanErrorKind, SourceUnit};
use std::path::PathBuf;

/// Read pre-resolved paths into source units. Unreadable files degrade to
/// `ScanError` records instead of failing the run.
pub fn read_units(paths: &[PathBuf]) -> (Vec<SourceUnit>, Vec<ScanError>) {
    let mut units = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => units.push(SourceUnit::new(path.clone(), content)),
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), e);
                errors.push(ScanError::new(
                    ScanErrorKind::UnreadableFile,
                    path.clone(),
                    e.to_string(),
                ));
            }
        }
    }

    (units, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unreadable_file_degrades_to_scan_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.rs");
        let mut f = std::fs::File::create(&good).unwrap();
        writeln!(f, "fn ok() {{}}").unwrap();
        let missing = dir.path().join("missing.rs");

        let (units, errors) = read_units(&[good.clone(), missing.clone()]);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].path, good);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ScanErrorKind::UnreadableFile);
        assert_eq!(errors[0].file, missing);
    }
}
