use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tracing::{debug, info};

use crate::classfile::{list_archives, visit_source};
use crate::semantic::graphs::DirectedGraph;
use crate::semantic::registry::Registry;
use crate::semantic::symbol_table::{SymbolId, SymbolTable};
use crate::semantic::{
    DefinitionBuilder, DependencyBuilder, IgnoredDefinition, SymbolCollector, SymbolSet,
    build_inheritance_graph,
};

use super::config::SessionConfig;
use super::error::{SessionError, SetError};
use super::sets::{NamedSet, PredefinedSet, UNEXTENSIBLE_PACKAGES, is_mutable_name};

/// Registry and graphs produced by one rebuild.
#[derive(Debug)]
pub(crate) struct Model {
    pub(crate) registry: Registry,
    pub(crate) inheritance: DirectedGraph<SymbolId>,
    pub(crate) dependencies: DirectedGraph<SymbolId>,
}

impl Model {
    fn empty(symbols: &SymbolTable) -> Self {
        Self {
            registry: Registry::new(symbols),
            inheritance: DirectedGraph::new(),
            dependencies: DirectedGraph::new(),
        }
    }
}

/// All state of one analysis: opened files, identifiers, the model built from
/// the definition files, and the named sets.
///
/// File changes only mark the model stale; [`ensure_built`](Self::ensure_built)
/// rebuilds it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    pub(crate) symbols: SymbolTable,
    pub(crate) model: Model,
    stale: bool,
    files: IndexSet<SmolStr>,
    symbol_files: IndexSet<SmolStr>,
    pub(super) sets: IndexMap<SmolStr, NamedSet>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let symbols = SymbolTable::with_root_type(&config.root_type);
        let model = Model::empty(&symbols);
        let sets = PredefinedSet::ALL
            .iter()
            .map(|&rule| (rule.name().into(), NamedSet::predefined(rule)))
            .collect();
        Self {
            config,
            symbols,
            model,
            stale: false,
            files: IndexSet::new(),
            symbol_files: IndexSet::new(),
            sets,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn registry(&self) -> &Registry {
        &self.model.registry
    }

    pub fn inheritance(&self) -> &DirectedGraph<SymbolId> {
        &self.model.inheritance
    }

    pub fn dependencies(&self) -> &DirectedGraph<SymbolId> {
        &self.model.dependencies
    }

    /// Whether definition files changed since the last build.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// The archives an argument stands for: the path itself for a file, the
    /// matching archives inside a directory, or the directory itself when it
    /// holds no archives and is read as a class tree.
    pub fn archives_of(&self, path: &Path) -> Result<Vec<PathBuf>, SessionError> {
        if !path.is_dir() {
            return Ok(vec![path.to_path_buf()]);
        }
        let archives = list_archives(path, self.config.archive_extensions.as_slice())?;
        if archives.is_empty() {
            Ok(vec![path.to_path_buf()])
        } else {
            Ok(archives)
        }
    }

    /// Definition files in the order they were opened.
    pub fn files(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.iter().map(SmolStr::as_str)
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains(&file_key(path))
    }

    /// Adds a file to the definitions pass. Returns false if already present.
    pub fn add_definitions_file(&mut self, path: &Path) -> bool {
        let added = self.files.insert(file_key(path));
        if added {
            self.stale = true;
        }
        added
    }

    pub fn remove_definitions_file(&mut self, path: &Path) -> bool {
        let removed = self.files.shift_remove(&file_key(path));
        if removed {
            self.stale = true;
        }
        removed
    }

    pub fn symbol_files(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbol_files.iter().map(SmolStr::as_str)
    }

    pub fn contains_symbol_file(&self, path: &Path) -> bool {
        self.symbol_files.contains(&file_key(path))
    }

    /// Interns the symbols a file declares and exposes them as a predefined
    /// set named by the path. Returns false if the file was already loaded.
    pub fn add_symbols_file(&mut self, path: &Path) -> Result<bool, SessionError> {
        let key = file_key(path);
        if self.symbol_files.contains(&key) {
            return Ok(false);
        }
        let mut symbols = self.symbols.clone();
        let mut collector = SymbolCollector::new(&mut symbols);
        let classes = visit_source(path, &mut collector)?;
        let declared = collector.finish();
        debug!(
            "[SESSION] {} declares {} symbols in {} classes",
            key,
            declared.len(),
            classes
        );

        self.symbols = symbols;
        self.sets.insert(key.clone(), NamedSet::File(declared));
        self.symbol_files.insert(key);
        self.invalidate_predefined();
        Ok(true)
    }

    /// The symbols a loaded file declares.
    pub fn symbols_of_file(&self, path: &Path) -> Option<&SymbolSet> {
        match self.sets.get(file_key(path).as_str())? {
            NamedSet::File(set) => Some(set),
            _ => None,
        }
    }

    pub fn remove_symbols_file(&mut self, path: &Path) -> bool {
        let key = file_key(path);
        if !self.symbol_files.shift_remove(&key) {
            return false;
        }
        self.sets.shift_remove(&key);
        true
    }

    /// Loads a file's symbols and adds it to the definitions pass.
    pub fn open(&mut self, path: &Path) -> Result<(), SessionError> {
        self.add_symbols_file(path)?;
        self.add_definitions_file(path);
        Ok(())
    }

    /// Undoes [`open`](Self::open). Returns false if the file was not open.
    pub fn close(&mut self, path: &Path) -> bool {
        if !self.remove_symbols_file(path) {
            return false;
        }
        self.remove_definitions_file(path);
        true
    }

    // ========================================================================
    // Rebuild
    // ========================================================================

    /// Rebuilds the registry and both graphs if any definition file changed.
    ///
    /// Returns the classes ignored as duplicates. On error nothing changes.
    pub fn ensure_built(&mut self) -> Result<Vec<IgnoredDefinition>, SessionError> {
        if !self.stale {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let mut symbols = self.symbols.clone();
        let mut registry = Registry::new(&symbols);

        let mut definitions = DefinitionBuilder::new(&mut symbols, &mut registry);
        for file in &self.files {
            visit_source(Path::new(file.as_str()), &mut definitions)?;
        }
        let ignored = definitions.finish();
        debug!(
            "[SESSION] definitions pass: {} definitions in {:?}",
            registry.len(),
            started.elapsed()
        );

        let inheritance = build_inheritance_graph(&symbols, &registry);
        let mut dependencies = DirectedGraph::new();
        let mut builder = DependencyBuilder::new(&mut symbols, &mut registry, &mut dependencies)
            .with_debug_info(self.config.include_debug_info);
        for file in &self.files {
            visit_source(Path::new(file.as_str()), &mut builder)?;
        }
        builder.finish()?;
        debug!(
            "[SESSION] dependency pass: {} edges, {} inheritance edges in {:?}",
            dependencies.edge_count(),
            inheritance.edge_count(),
            started.elapsed()
        );

        for duplicate in &ignored {
            info!(
                "[SESSION] ignoring duplicate definition of {} in {}",
                symbols.display(duplicate.type_id),
                duplicate.file
            );
        }

        self.symbols = symbols;
        self.model = Model {
            registry,
            inheritance,
            dependencies,
        };
        self.stale = false;
        self.invalidate_predefined();
        Ok(ignored)
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    /// Interns the identifier a saved list line names: `pkg`, `pkg/Type` or
    /// `pkg/Type.member.descriptor`. A single path is a type when its simple
    /// name starts with an uppercase letter. Returns `None` for any other
    /// shape.
    pub fn intern_path(&mut self, path: &str) -> Option<SymbolId> {
        let parts: Vec<&str> = path.split('.').collect();
        let id = match parts.as_slice() {
            [single] => {
                let simple = single.rsplit('/').next().unwrap_or_default();
                if simple.starts_with(char::is_uppercase) {
                    self.symbols.intern_type(single)
                } else {
                    self.symbols.intern_package(single)
                }
            }
            [owner, member, descriptor] => {
                let owner = self.symbols.intern_type(owner);
                if descriptor.starts_with('(') {
                    self.symbols.intern_method(owner, member, descriptor)
                } else {
                    self.symbols.intern_field(owner, member, descriptor)
                }
            }
            _ => return None,
        };
        self.invalidate_predefined();
        Some(id)
    }

    fn invalidate_predefined(&mut self) {
        for set in self.sets.values_mut() {
            set.invalidate();
        }
    }

    fn invalidate_externals(&mut self) {
        if let Some(set) = self.sets.get_mut(PredefinedSet::Externals.name()) {
            set.invalidate();
        }
    }

    // ========================================================================
    // Named sets
    // ========================================================================

    pub fn has_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Whether `name` is a predefined or symbol file set.
    pub fn is_predefined_set(&self, name: &str) -> bool {
        self.sets.get(name).is_some_and(|set| !set.is_mutable())
    }

    pub fn set_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sets.keys().map(SmolStr::as_str)
    }

    /// The members of a named set, computing a predefined set on first use.
    pub fn set(&self, name: &str) -> Option<&SymbolSet> {
        Some(match self.sets.get(name)? {
            NamedSet::Mutable(set) | NamedSet::File(set) => set,
            NamedSet::Predefined { rule, cache } => {
                cache.get_or_init(|| self.compute_predefined(*rule))
            }
        })
    }

    pub fn is_valid_mutable_set_name(&self, name: &str) -> bool {
        !self.is_predefined_set(name) && is_mutable_name(name)
    }

    pub fn is_valid_new_set_name(&self, name: &str) -> bool {
        !self.has_set(name) && self.is_valid_mutable_set_name(name)
    }

    /// Creates an empty user set. A predefined name is reported as reserved.
    pub fn create_set(&mut self, name: &str) -> Result<(), SetError> {
        if self.is_predefined_set(name) {
            return Err(SetError::Predefined(name.into()));
        }
        if !self.is_valid_new_set_name(name) {
            return Err(SetError::InvalidNewName(name.into()));
        }
        self.store(name, SymbolSet::default());
        Ok(())
    }

    /// Replaces (or creates) the user set `name`.
    pub fn assign_set(&mut self, name: &str, values: SymbolSet) -> Result<(), SetError> {
        if !self.is_valid_mutable_set_name(name) {
            return Err(SetError::InvalidName(name.into()));
        }
        self.store(name, values);
        Ok(())
    }

    pub fn delete_set(&mut self, name: &str) -> Result<(), SetError> {
        self.check_mutable(name)?;
        self.sets.shift_remove(name);
        self.touched(name);
        Ok(())
    }

    pub fn add_to_set(&mut self, name: &str, values: &SymbolSet) -> Result<(), SetError> {
        self.mutable(name)?.extend(values.iter().copied());
        self.touched(name);
        Ok(())
    }

    pub fn remove_from_set(&mut self, name: &str, values: &SymbolSet) -> Result<(), SetError> {
        self.mutable(name)?.retain(|id| !values.contains(id));
        self.touched(name);
        Ok(())
    }

    /// Moves `values` out of `from` and into `to`.
    pub fn move_between(
        &mut self,
        from: &str,
        to: &str,
        values: &SymbolSet,
    ) -> Result<(), SetError> {
        self.check_mutable(to)?;
        self.remove_from_set(from, values)?;
        self.add_to_set(to, values)
    }

    /// Fails unless `name` is an existing user set.
    pub fn check_mutable(&self, name: &str) -> Result<(), SetError> {
        match self.sets.get(name) {
            None => Err(SetError::Missing(name.into())),
            Some(set) if !set.is_mutable() => Err(SetError::Predefined(name.into())),
            Some(_) => Ok(()),
        }
    }

    fn mutable(&mut self, name: &str) -> Result<&mut SymbolSet, SetError> {
        match self.sets.get_mut(name) {
            Some(NamedSet::Mutable(set)) => Ok(set),
            Some(_) => Err(SetError::Predefined(name.into())),
            None => Err(SetError::Missing(name.into())),
        }
    }

    fn store(&mut self, name: &str, values: SymbolSet) {
        self.sets.insert(name.into(), NamedSet::Mutable(values));
        self.touched(name);
    }

    fn touched(&mut self, name: &str) {
        if name == UNEXTENSIBLE_PACKAGES {
            self.invalidate_externals();
        }
    }
}

fn file_key(path: &Path) -> SmolStr {
    path.to_string_lossy().into()
}
