//! Named sets: the predefined catalogue and the per-name storage.

use std::cell::OnceCell;

use crate::semantic::SymbolSet;

/// Name of the one user set that feeds a predefined set ([`PredefinedSet::Externals`]).
pub const UNEXTENSIBLE_PACKAGES: &str = "UnextensiblePackages";

macro_rules! predefined_sets {
    ($($variant:ident => $name:literal, $help:literal;)*) => {
        /// Sets computed from the model rather than assigned by the user.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PredefinedSet {
            $(#[doc = $help] $variant,)*
        }

        impl PredefinedSet {
            pub const ALL: &'static [PredefinedSet] = &[$(PredefinedSet::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(PredefinedSet::$variant => $name,)*
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(PredefinedSet::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

predefined_sets! {
    All => "All", "Every symbol known to the session.";
    Empty => "Empty", "The empty set.";
    Packages => "Packages", "All package symbols currently loaded.";
    Types => "Types", "All type symbols currently loaded.";
    Methods => "Methods", "All method symbols currently loaded.";
    Fields => "Fields", "All field symbols currently loaded.";
    Definitions => "Definitions", "Symbols which have been added to the dependency graph.";
    NativeMethods => "NativeMethods", "Methods implemented by native code.";
    AbstractMethods => "AbstractMethods", "Abstract methods of classes and interfaces.";
    Interfaces => "Interfaces", "All interface types.";
    Classes => "Classes", "All defined types which are not interfaces.";
    Publics => "Publics", "Types, fields and methods which are public.";
    Protecteds => "Protecteds", "Types, fields and methods which are protected.";
    Privates => "Privates", "Types, fields and methods which are private.";
    PackagePrivates => "PackagePrivates", "Types, fields and methods which are package private.";
    Statics => "Statics", "All static types, fields and methods.";
    Finals => "Finals", "Types, fields and methods which are final.";
    SynchronizedMethods => "SynchronizedMethods", "Methods which are synchronized.";
    VolatileFields => "VolatileFields", "Fields which are volatile.";
    VarArgsMethods => "VarArgsMethods", "Methods whose last argument is a varargs array.";
    TransientFields => "TransientFields", "Fields which are not part of the persistent state of an object.";
    AbstractClasses => "AbstractClasses", "Abstract classes. Does not include interfaces.";
    Stricts => "Stricts", "Classes and methods which use strict floating point.";
    Synthetics => "Synthetics", "Compiler generated types, fields and methods.";
    Externals => "Externals", "Symbols visible outside their archive. Package privates in UnextensiblePackages are not.";
    Annotations => "Annotations", "Types which are annotations.";
    Overrides => "Overrides", "Methods which override a superclass method or implement an interface method.";
    Initializers => "Initializers", "Instance initializers, aka constructors.";
    StaticInitializers => "StaticInitializers", "Static initializers.";
}

/// Storage behind one set name.
#[derive(Debug)]
pub(super) enum NamedSet {
    /// Assigned and edited by the user.
    Mutable(SymbolSet),
    /// Computed on first use after each rebuild.
    Predefined {
        rule: PredefinedSet,
        cache: OnceCell<SymbolSet>,
    },
    /// The symbols declared by a symbol file; read-only.
    File(SymbolSet),
}

impl NamedSet {
    pub(super) fn predefined(rule: PredefinedSet) -> Self {
        NamedSet::Predefined {
            rule,
            cache: OnceCell::new(),
        }
    }

    pub(super) fn is_mutable(&self) -> bool {
        matches!(self, NamedSet::Mutable(_))
    }

    pub(super) fn invalidate(&mut self) {
        if let NamedSet::Predefined { cache, .. } = self {
            cache.take();
        }
    }
}

/// A name a user set may be assigned to: non-empty, not predefined and not a
/// symbol path.
pub(super) fn is_mutable_name(name: &str) -> bool {
    !name.is_empty() && PredefinedSet::from_name(name).is_none() && !name.contains(['.', '/'])
}
