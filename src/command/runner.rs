use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cleave::{ArchiveReducer, CleaveError};
use crate::query::{Name, Outcome, execute_statement};
use crate::semantic::registry::Definition;
use crate::semantic::symbol_table::SymbolId;
use crate::semantic::{DefinitionKind, SymbolSet};
use crate::session::{Session, SessionConfig};

use super::diagnostics::Diagnostic;
use super::kind::CommandKind;
use super::line::CommandLine;

/// Output of one command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CommandOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    fn println(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn print_sorted<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut strings: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        strings.sort();
        self.lines.extend(strings);
    }
}

/// Runs command lines against one session.
pub struct CommandRunner {
    session: Session,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl CommandRunner {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            session: Session::new(config),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs one line: a command when the first word names one, otherwise a
    /// query statement. Blank lines and comments do nothing.
    pub fn run_line(&mut self, text: &str) -> CommandOutput {
        let mut line = CommandLine::new(text);
        let mut out = CommandOutput::default();
        if line.is_at_end() {
            return out;
        }

        match line.peek_command() {
            Some(command) => {
                line.skip();
                debug!("[COMMAND] {}", command.name());
                self.run_command(command, &mut line, &mut out);
            }
            None => self.run_statement(&mut line, &mut out),
        }

        out.diagnostics
            .extend(line.take_errors().into_iter().map(Diagnostic::from));
        out
    }

    fn run_command(
        &mut self,
        command: CommandKind,
        line: &mut CommandLine<'_>,
        out: &mut CommandOutput,
    ) {
        if command.is_file_command() {
            match command {
                CommandKind::Open => self.open(line),
                CommandKind::OpenAssign => self.open_assign(line),
                CommandKind::OpenSymbols => self.open_symbols(line),
                CommandKind::Close => self.close(line),
                CommandKind::Clear => self.clear(line),
                CommandKind::ListOpenFiles => {
                    line.ensure_empty();
                    if !line.had_error() {
                        out.print_sorted(self.session.files());
                    }
                }
                CommandKind::ListSymbolFiles => {
                    line.ensure_empty();
                    if !line.had_error() {
                        out.print_sorted(self.session.symbol_files());
                    }
                }
                _ => {}
            }
            return;
        }

        if !self.ensure_built(out) {
            return;
        }
        match command {
            CommandKind::ListSets => {
                line.ensure_empty();
                if !line.had_error() {
                    out.print_sorted(self.session.set_names());
                }
            }
            CommandKind::List => {
                if let Some(set) = self.value_then_end(line) {
                    out.print_sorted(set.iter().map(|id| self.session.symbols().display(*id)));
                }
            }
            CommandKind::Size => {
                if let Some(set) = self.value_then_end(line) {
                    out.println(set.len().to_string());
                }
            }
            CommandKind::Info => {
                if let Some(set) = self.value_then_end(line) {
                    self.info(&set, out);
                }
            }
            CommandKind::From | CommandKind::To => self.distances(command, line, out),
            CommandKind::Create => self.create(line),
            CommandKind::Delete => {
                let name = line.mutable_set(&self.session);
                line.ensure_empty();
                if let (Some(name), false) = (name, line.had_error()) {
                    self.apply(line, &name, |session, set| session.delete_set(set));
                }
            }
            CommandKind::Add | CommandKind::Remove => {
                let name = line.mutable_set(&self.session);
                let values = line.value(&self.session);
                line.ensure_empty();
                if let (Some(name), Some(values), false) = (name, values, line.had_error()) {
                    if command == CommandKind::Add {
                        self.apply(line, &name, |session, set| session.add_to_set(set, &values));
                    } else {
                        self.apply(line, &name, |session, set| {
                            session.remove_from_set(set, &values)
                        });
                    }
                }
            }
            CommandKind::Assign => {
                let name = line.word("new set name");
                let values = line.value(&self.session);
                line.ensure_empty();
                if let (Some(name), Some(values), false) = (name, values, line.had_error()) {
                    if self.check_mutable_name(line, &name) {
                        self.apply(line, &name, |session, set| session.assign_set(set, values));
                    }
                }
            }
            CommandKind::Move => {
                let from = line.mutable_set(&self.session);
                let to = line.mutable_set(&self.session);
                let values = line.value(&self.session);
                line.ensure_empty();
                if let (Some(from), Some(to), Some(values), false) =
                    (from, to, values, line.had_error())
                {
                    self.apply(line, &to, |session, to| {
                        session.move_between(&from.value, to, &values)
                    });
                }
            }
            CommandKind::WriteList => self.write_list(line),
            CommandKind::ReadList => self.read_list(line, out),
            CommandKind::Cleave => self.cleave(line, out),
            _ => {}
        }
    }

    fn run_statement(&mut self, line: &mut CommandLine<'_>, out: &mut CommandOutput) {
        let statement = line.statement();
        if statement.is_some() {
            line.ensure_empty();
        }
        let Some(statement) = statement.filter(|_| !line.had_error()) else {
            return;
        };
        if !self.ensure_built(out) {
            return;
        }
        match execute_statement(&mut self.session, statement) {
            Ok(Outcome::Set(set)) => {
                out.print_sorted(set.iter().map(|id| self.session.symbols().display(*id)))
            }
            Ok(Outcome::Assigned { .. }) => {}
            Err(err) => line.report(err),
        }
    }

    // =========================================================================
    // Session helpers
    // =========================================================================

    /// Rebuilds the model if needed, reporting ignored duplicates as warnings
    /// and a failed rebuild as an error.
    fn ensure_built(&mut self, out: &mut CommandOutput) -> bool {
        match self.session.ensure_built() {
            Ok(ignored) => {
                for duplicate in ignored {
                    out.diagnostics.push(Diagnostic::warning(format!(
                        "Ignoring duplicate definition of '{}' in file '{}'.",
                        self.session.symbols().display(duplicate.type_id),
                        duplicate.file
                    )));
                }
                true
            }
            Err(err) => {
                out.diagnostics.push(Diagnostic::error(err.to_string()));
                false
            }
        }
    }

    fn value_then_end(&self, line: &mut CommandLine<'_>) -> Option<SymbolSet> {
        let value = line.value(&self.session);
        line.ensure_empty();
        value.filter(|_| !line.had_error())
    }

    fn check_mutable_name(&self, line: &mut CommandLine<'_>, name: &Name) -> bool {
        if self.session.is_valid_mutable_set_name(&name.value) {
            return true;
        }
        line.error(
            name.range,
            format!("'{}' is not a valid set name", name.value),
        );
        false
    }

    /// Runs a set mutation, reporting a rejection over the set name.
    fn apply<E: ToString>(
        &mut self,
        line: &mut CommandLine<'_>,
        name: &Name,
        mutation: impl FnOnce(&mut Session, &str) -> Result<(), E>,
    ) {
        if let Err(err) = mutation(&mut self.session, &name.value) {
            line.error(name.range, err.to_string());
        }
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// The archives a file argument stands for.
    fn archives(&self, line: &mut CommandLine<'_>, file: &Name) -> Option<Vec<PathBuf>> {
        match self.session.archives_of(Path::new(file.value.as_str())) {
            Ok(archives) => Some(archives),
            Err(err) => {
                line.error(file.range, err.to_string());
                None
            }
        }
    }

    /// Opens every archive behind `file`, stopping at the first failure.
    fn open_file(&mut self, line: &mut CommandLine<'_>, file: &Name) -> Option<Vec<PathBuf>> {
        let archives = self.archives(line, file)?;
        for archive in &archives {
            if let Err(err) = self.session.open(archive) {
                line.error(file.range, err.to_string());
                return None;
            }
        }
        Some(archives)
    }

    fn open(&mut self, line: &mut CommandLine<'_>) {
        let file = line.file_name();
        line.ensure_empty();
        if let (Some(file), false) = (file, line.had_error()) {
            self.open_file(line, &file);
        }
    }

    fn open_assign(&mut self, line: &mut CommandLine<'_>) {
        let name = line.word("new set name");
        let file = line.file_name();
        line.ensure_empty();
        let (Some(name), Some(file), false) = (name, file, line.had_error()) else {
            return;
        };
        if !self.check_mutable_name(line, &name) {
            return;
        }
        let Some(archives) = self.open_file(line, &file) else {
            return;
        };
        let values: SymbolSet = archives
            .iter()
            .filter_map(|archive| self.session.symbols_of_file(archive))
            .flatten()
            .copied()
            .collect();
        self.apply(line, &name, |session, set| session.assign_set(set, values));
    }

    fn open_symbols(&mut self, line: &mut CommandLine<'_>) {
        let file = line.file_name();
        line.ensure_empty();
        let (Some(file), false) = (file, line.had_error()) else {
            return;
        };
        for archive in self.archives(line, &file).unwrap_or_default() {
            if let Err(err) = self.session.add_symbols_file(&archive) {
                line.error(file.range, err.to_string());
            }
        }
    }

    fn close(&mut self, line: &mut CommandLine<'_>) {
        let file = line.file_name();
        line.ensure_empty();
        let (Some(file), false) = (file, line.had_error()) else {
            return;
        };
        for archive in self.archives(line, &file).unwrap_or_default() {
            if !self.session.close(&archive) {
                line.error(
                    file.range,
                    format!("File '{}' is not open.", archive.display()),
                );
                return;
            }
        }
    }

    fn clear(&mut self, line: &mut CommandLine<'_>) {
        line.ensure_empty();
        if !line.had_error() {
            self.session = Session::new(self.session.config().clone());
        }
    }

    // =========================================================================
    // Sets
    // =========================================================================

    fn create(&mut self, line: &mut CommandLine<'_>) {
        let name = line.word("new set name");
        line.ensure_empty();
        let (Some(name), false) = (name, line.had_error()) else {
            return;
        };
        self.apply(line, &name, |session, set| session.create_set(set));
    }

    fn write_list(&mut self, line: &mut CommandLine<'_>) {
        let file = line.file_name();
        let values = line.value(&self.session);
        line.ensure_empty();
        let (Some(file), Some(values), false) = (file, values, line.had_error()) else {
            return;
        };
        let symbols = self.session.symbols();
        let mut names: Vec<String> = values
            .iter()
            .map(|id| symbols.display(*id).to_string())
            .collect();
        names.sort();
        let mut text = String::new();
        for name in names {
            let _ = writeln!(text, "{}", name);
        }
        if let Err(err) = fs::write(file.value.as_str(), text) {
            line.error(
                file.range,
                format!("Error '{}' writing to file:'{}'", err, file.value),
            );
        }
    }

    /// Reads a list written by `writeList`. Every line names one identifier,
    /// interned if new. Nothing is assigned if any line is malformed.
    fn read_list(&mut self, line: &mut CommandLine<'_>, out: &mut CommandOutput) {
        let file = line.file_name();
        let name = line.word("new set name");
        line.ensure_empty();
        let (Some(file), Some(name), false) = (file, name, line.had_error()) else {
            return;
        };
        if !self.check_mutable_name(line, &name) {
            return;
        }
        let text = match fs::read_to_string(file.value.as_str()) {
            Ok(text) => text,
            Err(err) => {
                line.error(
                    file.range,
                    format!("Error '{}' reading list from file:'{}'", err, file.value),
                );
                return;
            }
        };

        let mut values = SymbolSet::default();
        let mut failed = false;
        for (index, entry) in text.lines().enumerate() {
            if entry.trim().is_empty() {
                continue;
            }
            out.println(entry);
            match self.read_id(entry) {
                Ok(id) => {
                    values.insert(id);
                }
                Err((column, message)) => {
                    failed = true;
                    out.diagnostics.push(Diagnostic::error(format!(
                        "{}({}, {}) {}",
                        file.value,
                        index + 1,
                        column,
                        message
                    )));
                    if index == 0 {
                        break;
                    }
                }
            }
        }
        if !failed {
            self.apply(line, &name, |session, set| session.assign_set(set, values));
        }
    }

    /// One identifier on a line of its own, as the column and message of the
    /// first problem on failure.
    fn read_id(&mut self, text: &str) -> Result<SymbolId, (u32, String)> {
        let mut entry = CommandLine::new(text);
        let word = entry.word("id");
        entry.ensure_empty();
        let id = word.and_then(|word| {
            let id = self.session.intern_path(&word.value);
            if id.is_none() {
                entry.error(word.range, format!("'{}' is not a valid id", word.value));
            }
            id
        });
        match entry.take_errors().into_iter().next() {
            Some(err) => Err((u32::from(err.range.start()), err.message)),
            None => id.ok_or((0, format!("'{}' is not a valid id", text))),
        }
    }

    // =========================================================================
    // Reports
    // =========================================================================

    fn distances(&self, command: CommandKind, line: &mut CommandLine<'_>, out: &mut CommandOutput) {
        let start = line.value(&self.session);
        let bound = if line.is_at_end() || line.had_error() {
            None
        } else {
            line.value(&self.session)
        };
        line.ensure_empty();
        let (Some(start), false) = (start, line.had_error()) else {
            return;
        };
        let layers = match command {
            CommandKind::From => self.session.distances_from(&start, bound.as_ref()),
            _ => self.session.distances_to(&start, bound.as_ref()),
        };
        let symbols = self.session.symbols();
        for (distance, layer) in layers.iter().enumerate().skip(1) {
            out.println(format!("Distance {}", distance));
            out.print_sorted(layer.iter().map(|id| symbols.display(*id)));
        }
    }

    fn info(&self, set: &SymbolSet, out: &mut CommandOutput) {
        let symbols = self.session.symbols();
        let mut ids: Vec<SymbolId> = set.iter().copied().collect();
        ids.sort_by_cached_key(|id| symbols.display(*id).to_string());
        for (index, id) in ids.into_iter().enumerate() {
            if index > 0 {
                out.println("");
            }
            match self.session.registry().get(id) {
                Some(definition) => self.print_definition(definition, out),
                None => out.println(format!("Name: {}", symbols.display(id))),
            }
        }
    }

    fn print_definition(&self, definition: &Definition, out: &mut CommandOutput) {
        let symbols = self.session.symbols();
        let display = |id: Option<SymbolId>| match id {
            Some(id) => symbols.display(id).to_string(),
            None => "null".to_string(),
        };
        out.println(format!("Name: {}", symbols.display(definition.id)));
        out.println(format!("Type: {}", symbols.kind(definition.id)));
        out.println(format!("Access: {:X}", definition.access));
        out.println(format!("Parent: {}", display(definition.parent())));
        if let DefinitionKind::Type(ty) = &definition.kind {
            out.println(format!("Super: {}", display(ty.super_type)));
            for interface in &ty.interfaces {
                out.println(format!("Interface: {}", symbols.display(*interface)));
            }
            out.println(format!("File: {}", ty.file));
        }
        for (index, annotation) in definition.annotations.values().enumerate() {
            out.println(format!(
                "  Annotation {}. Type: {}",
                index + 1,
                symbols.display(annotation.type_id)
            ));
            for (name, value) in &annotation.elements {
                out.println(format!("    {}: {}", name, value));
            }
        }
    }

    // =========================================================================
    // Cleave
    // =========================================================================

    fn cleave(&mut self, line: &mut CommandLine<'_>, out: &mut CommandOutput) {
        let input = line.file_name();
        let output = line.file_name();
        let whitelist = line.value(&self.session);
        line.ensure_empty();
        let (Some(input), Some(output), Some(whitelist), false) =
            (input, output, whitelist, line.had_error())
        else {
            return;
        };
        if self.open_file(line, &input).is_none() || !self.ensure_built(out) {
            return;
        }

        let reducer = ArchiveReducer::new(&self.session);
        let result = reducer.reduce(
            Path::new(input.value.as_str()),
            Path::new(output.value.as_str()),
            &whitelist,
        );
        match result {
            Ok(summary) => debug!("[COMMAND] cleave wrote {:?}", summary),
            Err(CleaveError::Rejected(problems)) => {
                for problem in problems {
                    line.error(input.range, problem.to_string());
                }
            }
            Err(err @ CleaveError::MissingDefinition(_)) => {
                line.error(input.range, err.to_string());
            }
            Err(err) => line.error(input.range, format!("IO Error '{}'", err)),
        }
    }
}
