use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;
use zip::ZipArchive;

use super::error::SourceError;
use super::model::ClassFile;
use super::visitor::ClassVisitor;

const CLASS_SUFFIX: &str = ".class";

/// Feeds every class of an archive or class directory to `visitor`.
///
/// Directories are walked recursively in file-name order; archives are read in
/// entry order. Returns the number of classes visited.
pub fn visit_source<V: ClassVisitor + ?Sized>(
    path: &Path,
    visitor: &mut V,
) -> Result<usize, SourceError> {
    let options = visitor.decode_options();
    visitor.visit_source(path);

    let mut visited = 0;
    let mut accept = |entry: &str, bytes: &[u8]| -> Result<(), SourceError> {
        let class = ClassFile::parse(bytes, options).map_err(|source| SourceError::ClassFile {
            path: path.to_path_buf(),
            entry: entry.to_string(),
            source,
        })?;
        trace!("[SOURCE] visiting {} from {}", class.name, entry);
        class.accept(visitor);
        visited += 1;
        Ok(())
    };

    if path.is_dir() {
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|err| SourceError::Io {
                path: path.to_path_buf(),
                source: err.into(),
            })?;
            if !entry.file_type().is_file()
                || !entry.file_name().to_string_lossy().ends_with(CLASS_SUFFIX)
            {
                continue;
            }
            let bytes = fs::read(entry.path()).map_err(|source| SourceError::Io {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let relative = entry.path().strip_prefix(path).unwrap_or(entry.path());
            accept(&relative.to_string_lossy(), &bytes)?;
        }
    } else {
        let mut archive = open_archive(path)?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| SourceError::Zip {
                path: path.to_path_buf(),
                source,
            })?;
            if !entry.is_file() || !entry.name().ends_with(CLASS_SUFFIX) {
                continue;
            }
            let name = entry.name().to_string();
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|source| SourceError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            drop(entry);
            accept(&name, &bytes)?;
        }
    }

    debug!("[SOURCE] visited {} classes in {}", visited, path.display());
    Ok(visited)
}

pub(crate) fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(BufReader::new(file)).map_err(|source| SourceError::Zip {
        path: path.to_path_buf(),
        source,
    })
}

/// Lists the archives directly inside `dir` whose extension is one of
/// `extensions`, sorted by path.
pub fn list_archives(
    dir: &Path,
    extensions: &[impl AsRef<str>],
) -> Result<Vec<PathBuf>, SourceError> {
    let io_error = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut archives = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if has_extension(&path, extensions) && path.is_file() {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}

fn has_extension(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    let Some(extension) = path.extension().and_then(OsStr::to_str) else {
        return false;
    };
    extensions
        .iter()
        .any(|want| want.as_ref().eq_ignore_ascii_case(extension))
}
