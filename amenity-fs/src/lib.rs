//! JSON artefact IO built on `cap-std` and `camino`.
//!
//! Norm tables, inventories, city profiles, feedback logs and message
//! templates all travel as JSON files named by the caller. Paths are opened
//! through ambient authority at the edge and every read or write goes through
//! a capability handle for the containing directory.
#![forbid(unsafe_code)]

use std::io::{self, BufReader, BufWriter, Write};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failures while reading or writing an artefact.
#[derive(Debug, Error)]
pub enum ArtefactError {
    /// The file could not be opened, created or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Path of the artefact.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The file did not contain the expected JSON document.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the artefact.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// The value could not be encoded as JSON.
    #[error("failed to encode {path}: {source}")]
    Encode {
        /// Path of the artefact.
        path: Utf8PathBuf,
        /// Underlying encoding failure.
        #[source]
        source: serde_json::Error,
    },
}

impl ArtefactError {
    fn io(path: &Utf8Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Deserialise the JSON document stored at `path`.
///
/// # Errors
/// Returns [`ArtefactError::Io`] when the file cannot be opened and
/// [`ArtefactError::Parse`] when its contents do not decode as `T`.
pub fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, ArtefactError> {
    let file = open_utf8_file(path).map_err(|err| ArtefactError::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtefactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise `value` as pretty-printed JSON at `path`, creating missing
/// parent directories and replacing any existing file.
///
/// # Errors
/// Returns [`ArtefactError::Io`] when the file cannot be written and
/// [`ArtefactError::Encode`] when `value` cannot be encoded.
pub fn write_json<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) -> Result<(), ArtefactError> {
    ensure_parent_dir(path).map_err(|err| ArtefactError::io(path, err))?;
    let (dir, name) = open_dir_and_file(path).map_err(|err| ArtefactError::io(path, err))?;
    let file = dir
        .create(name.as_str())
        .map_err(|err| ArtefactError::io(path, err))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ArtefactError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|err| ArtefactError::io(path, err))
}

/// Open a UTF-8 file path using ambient authority.
///
/// # Errors
/// Propagates the IO error when the file cannot be opened.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Whether `path` is a regular file rather than a directory or other entry.
///
/// # Errors
/// Returns an [`io::ErrorKind::NotFound`] error when nothing exists at
/// `path`, and propagates other IO failures.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Create the parent directory of `path` when it does not exist.
///
/// # Errors
/// Propagates the IO error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split a directory path into an ambient root handle and the remaining
/// relative components, so creation stays inside a capability.
fn split_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(drive).join(std::path::MAIN_SEPARATOR.to_string())
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if base.as_str() == "." {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("{parent} is not under {base}")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn utf8(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path")
    }

    #[rstest]
    fn writes_then_reads_nested_artefacts(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "out/nested/norms.json");
        let norms = BTreeMap::from([("park".to_owned(), 5.5), ("school".to_owned(), 7.0)]);

        write_json(&path, &norms).expect("write artefact");
        let loaded: BTreeMap<String, f64> = read_json(&path).expect("read artefact");

        assert_eq!(loaded, norms);
        assert!(file_is_file(&path).expect("stat artefact"));
    }

    #[rstest]
    fn missing_files_report_the_path(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "absent.json");
        let err = read_json::<serde_json::Value>(&path).expect_err("file is missing");
        assert!(matches!(err, ArtefactError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
        let missing = file_is_file(&path).expect_err("nothing to inspect");
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn malformed_json_is_a_parse_error(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "broken.json");
        std::fs::write(path.as_std_path(), "{ not json").expect("write fixture");
        let err = read_json::<serde_json::Value>(&path).expect_err("invalid json");
        assert!(matches!(err, ArtefactError::Parse { .. }));
    }

    #[rstest]
    fn directories_are_not_files(temp_dir: TempDir) {
        ensure_parent_dir(&utf8(&temp_dir, "sub/file.json")).expect("create parent");
        assert!(!file_is_file(&utf8(&temp_dir, "sub")).expect("stat directory"));
    }
}
