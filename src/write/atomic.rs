//! Atomic replacement of a destination file.
//!
//! Output goes to a temporary file in the destination directory, which is
//! flushed, synced and then renamed over the destination. Until the rename
//! the destination is never opened; if anything fails before it, the
//! temporary file is dropped and removed.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Error, Result};

const TEMP_PREFIX: &str = ".slidefill-";
const TEMP_SUFFIX: &str = ".tmp";

fn parent_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Atomically writes `bytes` to `dest`.
///
/// # Errors
///
/// Returns [`Error::WriteFailure`] if the temporary file cannot be created,
/// written, synced or renamed. The destination is left as it was.
pub fn commit_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    commit_with(dest, |sink| {
        sink.write_all(bytes)
            .map_err(|e| Error::write_failure(None, e))
    })
}

/// Atomically replaces `dest` with whatever `fill` writes.
///
/// `fill` receives a buffered writer over the temporary file. If it returns
/// an error the temporary file is discarded and the error is returned, with
/// the destination path attached to write failures.
pub fn commit_with<F>(dest: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let fail = |e| Error::write_failure(Some(dest), e);
    let dir = parent_dir(dest);

    let temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(fail)?;
    log::debug!("writing '{}' via '{}'", dest.display(), temp.path().display());

    let mut writer = BufWriter::new(temp);
    fill(&mut writer).map_err(|e| match e {
        Error::WriteFailure { path: None, source } => fail(source),
        other => other,
    })?;

    let temp = writer.into_inner().map_err(|e| fail(e.into_error()))?;
    temp.as_file().sync_all().map_err(fail)?;
    temp.persist(dest).map_err(|e| fail(e.error))?;

    // The destination is already replaced here; a failed directory sync is
    // only logged.
    #[cfg(unix)]
    {
        if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
            log::warn!("cannot sync directory '{}': {}", dir.display(), e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    fn leftovers(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(TEMP_PREFIX))
            .collect()
    }

    #[test]
    fn test_commit_creates_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("deck.pptx");
        commit_atomic(&dest, b"PK\x05\x06").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"PK\x05\x06");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_commit_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("deck.pptx");
        std::fs::write(&dest, b"old").unwrap();
        commit_atomic(&dest, b"new").unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    #[test]
    fn test_failure_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("deck.pptx");
        std::fs::write(&dest, b"previous valid output").unwrap();

        let err = commit_with(&dest, |sink| {
            sink.write_all(b"half of the new archive")
                .map_err(|e| Error::write_failure(None, e))?;
            Err(Error::write_failure(None, io::Error::other("disk full")))
        })
        .unwrap_err();

        match err {
            Error::WriteFailure { path, .. } => assert_eq!(path.as_deref(), Some(dest.as_path())),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous valid output");
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_failure_without_prior_output_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("deck.pptx");
        let result = commit_with(&dest, |_| Err(Error::InvalidMapping("stop".into())));
        assert!(matches!(result, Err(Error::InvalidMapping(_))));
        assert!(!dest.exists());
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_missing_directory_is_write_failure() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("no/such/dir/deck.pptx");
        assert!(matches!(
            commit_atomic(&dest, b"x"),
            Err(Error::WriteFailure { path: Some(_), .. })
        ));
    }
}
