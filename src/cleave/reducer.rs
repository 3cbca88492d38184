use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::classfile::{ClassLayout, SourceError, open_archive};
use crate::semantic::SymbolSet;
use crate::semantic::symbol_table::{SymbolId, SymbolKind};
use crate::session::Session;

use super::error::{CleaveError, CleaveProblem};

const MANIFEST: &str = "META-INF/MANIFEST.MF";
const CLASS_SUFFIX: &str = ".class";

/// Entries written, by what happened to them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaveSummary {
    pub classes_kept: usize,
    pub classes_dropped: usize,
    pub resources: usize,
}

/// Writes a copy of an archive that holds only whitelisted classes and
/// members.
pub struct ArchiveReducer<'a> {
    session: &'a Session,
}

impl<'a> ArchiveReducer<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Everything that stops `whitelist` from being cut out of `input`: ids the
    /// file does not declare, and supertypes of whitelisted types that have no
    /// definition. Each missing supertype is reported once.
    pub fn problems(&self, input: &Path, whitelist: &SymbolSet) -> Vec<CleaveProblem> {
        let symbols = self.session.symbols();
        let file = input.display().to_string();
        let declared = self.session.symbols_of_file(input);
        let mut problems: Vec<CleaveProblem> = sorted(whitelist)
            .into_iter()
            .filter(|id| !declared.is_some_and(|set| set.contains(id)))
            .map(|id| CleaveProblem::NotContained {
                file: file.clone(),
                id: symbols.display(id).to_string(),
            })
            .collect();
        if !problems.is_empty() {
            return problems;
        }

        let mut reported = SymbolSet::default();
        for ty in sorted(whitelist) {
            if symbols.kind(ty) != SymbolKind::Type {
                continue;
            }
            if let Some(missing) = self.session.first_missing_supertype(ty) {
                if reported.insert(missing) {
                    problems.push(CleaveProblem::MissingSupertype {
                        ty: symbols.display(ty).to_string(),
                        missing: symbols.display(missing).to_string(),
                    });
                }
            }
        }
        problems
    }

    /// Checks the whitelist, then streams `input` into `output`. Once `output`
    /// has been created, any error removes it again.
    pub fn reduce(
        &self,
        input: &Path,
        output: &Path,
        whitelist: &SymbolSet,
    ) -> Result<CleaveSummary, CleaveError> {
        let problems = self.problems(input, whitelist);
        if !problems.is_empty() {
            return Err(CleaveError::Rejected(problems));
        }

        let mut archive = open_archive(input)?;
        let file = File::create(output).map_err(|source| CleaveError::Io {
            path: output.to_path_buf(),
            source,
        })?;
        let result = self.write(&mut archive, input, file, output, whitelist);
        match &result {
            Ok(summary) => info!(
                "[CLEAVE] wrote {}: {} classes kept, {} dropped, {} resources",
                output.display(),
                summary.classes_kept,
                summary.classes_dropped,
                summary.resources
            ),
            Err(err) => {
                debug!("[CLEAVE] removing {}: {}", output.display(), err);
                let _ = fs::remove_file(output);
            }
        }
        result
    }

    fn write(
        &self,
        archive: &mut ZipArchive<BufReader<File>>,
        input: &Path,
        file: File,
        output: &Path,
        whitelist: &SymbolSet,
    ) -> Result<CleaveSummary, CleaveError> {
        let zip_error = |source: ZipError| CleaveError::Zip {
            path: output.to_path_buf(),
            source,
        };
        let io_error = |source: io::Error| CleaveError::Io {
            path: output.to_path_buf(),
            source,
        };

        let mut writer = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        let mut summary = CleaveSummary::default();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| SourceError::Zip {
                path: input.to_path_buf(),
                source,
            })?;
            let name = entry.name().to_string();
            if entry.is_dir() {
                writer.add_directory(name, options).map_err(zip_error)?;
                continue;
            }
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .map_err(|source| SourceError::Io {
                    path: input.to_path_buf(),
                    source,
                })?;
            drop(entry);

            let converted = if let Some(class_name) = name.strip_suffix(CLASS_SUFFIX) {
                let converted = self.convert_class(&name, class_name, &bytes, whitelist)?;
                if converted.is_some() {
                    summary.classes_kept += 1;
                } else {
                    summary.classes_dropped += 1;
                }
                converted
            } else {
                summary.resources += 1;
                if name.eq_ignore_ascii_case(MANIFEST) {
                    Some(self.convert_manifest(&bytes, whitelist))
                } else {
                    Some(bytes)
                }
            };

            if let Some(converted) = converted {
                writer.start_file(name, options).map_err(zip_error)?;
                writer.write_all(&converted).map_err(io_error)?;
            }
        }

        writer.finish().map_err(zip_error)?;
        Ok(summary)
    }

    /// The class without its non-whitelisted members, or `None` when the class
    /// itself is not whitelisted.
    fn convert_class(
        &self,
        entry: &str,
        class_name: &str,
        bytes: &[u8],
        whitelist: &SymbolSet,
    ) -> Result<Option<Vec<u8>>, CleaveError> {
        let symbols = self.session.symbols();
        let Some(ty) = symbols
            .existing_type(class_name)
            .filter(|ty| whitelist.contains(ty))
        else {
            return Ok(None);
        };
        if !self.session.registry().contains(ty) {
            return Err(CleaveError::MissingDefinition(symbols.display(ty).to_string()));
        }

        let layout = ClassLayout::parse(bytes).map_err(|source| CleaveError::ClassFile {
            entry: entry.to_string(),
            source,
        })?;
        let keep = |found: Option<SymbolId>| found.is_some_and(|id| whitelist.contains(&id));
        Ok(Some(layout.retain(
            bytes,
            |field| keep(symbols.existing_field(ty, &field.name, &field.descriptor)),
            |method| keep(symbols.existing_method(ty, &method.name, &method.descriptor)),
        )))
    }

    fn convert_manifest(&self, bytes: &[u8], whitelist: &SymbolSet) -> Vec<u8> {
        let Ok(text) = std::str::from_utf8(bytes) else {
            return bytes.to_vec();
        };
        let symbols = self.session.symbols();
        strip_main_class(text, |main_class| {
            symbols
                .existing_type(&main_class.replace('.', "/"))
                .is_some_and(|ty| whitelist.contains(&ty))
        })
        .into_bytes()
    }
}

/// Removes the `Main-Class` attribute of the main manifest section unless
/// `keep` accepts its value. Continuation lines (leading space) belong to the
/// attribute they follow.
pub(crate) fn strip_main_class(manifest: &str, keep: impl FnOnce(&str) -> bool) -> String {
    let lines: Vec<&str> = manifest.split_inclusive('\n').collect();
    let main_end = lines
        .iter()
        .position(|line| is_blank(line))
        .unwrap_or(lines.len());

    let Some(start) = lines[..main_end].iter().position(|line| {
        line.get(..11)
            .is_some_and(|key| key.eq_ignore_ascii_case("Main-Class:"))
    }) else {
        return manifest.to_string();
    };
    let end = lines[start + 1..main_end]
        .iter()
        .position(|line| !line.starts_with(' '))
        .map_or(main_end, |offset| start + 1 + offset);

    let mut value = lines[start][11..].trim().to_string();
    for continuation in &lines[start + 1..end] {
        value.push_str(continuation[1..].trim_end_matches(['\r', '\n']));
    }
    if keep(&value) {
        return manifest.to_string();
    }
    lines[..start]
        .iter()
        .chain(&lines[end..])
        .copied()
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).is_empty()
}

fn sorted(values: &SymbolSet) -> Vec<SymbolId> {
    let mut ids: Vec<SymbolId> = values.iter().copied().collect();
    ids.sort();
    ids
}
