macro_rules! commands {
    ($($variant:ident => $name:literal, $arguments:literal, $help:literal;)*) => {
        /// The commands a line may start with. Any other line is a query
        /// statement.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum CommandKind {
            $(#[doc = concat!("`", $name, " ", $arguments, "`: ", $help)] $variant,)*
        }

        impl CommandKind {
            pub const ALL: &'static [CommandKind] = &[$(CommandKind::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(CommandKind::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(CommandKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

commands! {
    Open => "open", "jar-file-name", "Loads the symbols and definitions of an archive, or of every archive in a directory.";
    OpenAssign => "openAssign", "new-set-name jar-file-name", "Opens an archive and assigns its symbols to a set.";
    OpenSymbols => "openSymbols", "jar-file-name", "Loads the symbols of an archive without its definitions.";
    Close => "close", "jar-file-name", "Unloads an archive opened with open, openAssign or openSymbols.";
    Clear => "clear", "", "Clears open files, symbols, sets and graphs.";
    ListSets => "listSets", "", "Displays the names of all sets.";
    ListOpenFiles => "listOpenFiles", "", "Displays the files opened with open.";
    ListSymbolFiles => "listSymbolFiles", "", "Displays the files whose symbols are loaded.";
    List => "list", "set-expression", "Displays the symbols of a set expression.";
    Size => "size", "set-expression", "Displays the number of symbols in a set expression.";
    Info => "info", "set-expression", "Displays the definitions of the symbols in a set expression.";
    From => "from", "set-expression [set-expression]", "Displays what a set depends on by distance, stopping at the second set.";
    To => "to", "set-expression [set-expression]", "Displays what depends on a set by distance, stopping at the second set.";
    Create => "create", "new-set-name", "Creates an empty set.";
    Delete => "delete", "set-name", "Deletes a set. Predefined sets cannot be deleted.";
    Add => "add", "set-name set-expression", "Adds a set expression to a set.";
    Remove => "remove", "set-name set-expression", "Removes a set expression from a set.";
    Assign => "assign", "set-name set-expression", "Replaces the contents of a set, creating it if needed.";
    Move => "move", "from-set-name to-set-name set-expression", "Moves a set expression from one set to another.";
    WriteList => "writeList", "file-name set-expression", "Writes the symbols of a set expression to a file, one per line.";
    ReadList => "readList", "file-name new-set-name", "Reads a file written by writeList into a set.";
    Cleave => "cleave", "input-jar-file-name output-jar-file-name set-expression", "Writes the part of an archive contained in a set expression.";
}

impl CommandKind {
    /// Commands that change or list the open files. They run without
    /// rebuilding the model first.
    pub fn is_file_command(self) -> bool {
        matches!(
            self,
            CommandKind::Open
                | CommandKind::OpenAssign
                | CommandKind::OpenSymbols
                | CommandKind::Close
                | CommandKind::Clear
                | CommandKind::ListOpenFiles
                | CommandKind::ListSymbolFiles
        )
    }
}
