//! Set algebra, predefined set rules and visibility queries.

use smol_str::SmolStr;

use crate::semantic::SymbolSet;
use crate::semantic::graphs::DirectedGraph;
use crate::semantic::registry::{Definition, DefinitionKind, RegistryError};
use crate::semantic::symbol_table::{SymbolId, SymbolKind};

use super::sets::{PredefinedSet, UNEXTENSIBLE_PACKAGES};
use super::state::Session;

impl Session {
    // ========================================================================
    // Graph neighbourhoods
    // ========================================================================

    /// Direct dependencies of `values`, excluding `values` themselves.
    pub fn from(&self, values: &SymbolSet) -> SymbolSet {
        direct(values, &self.model.dependencies, Direction::Out)
    }

    /// Direct dependents of `values`, excluding `values` themselves.
    pub fn to(&self, values: &SymbolSet) -> SymbolSet {
        direct(values, &self.model.dependencies, Direction::In)
    }

    pub fn transitive_from(&self, values: &SymbolSet) -> SymbolSet {
        let mut result = self
            .model
            .dependencies
            .reachable_from(values.iter().copied());
        result.extend(values.iter().copied());
        result
    }

    pub fn transitive_to(&self, values: &SymbolSet) -> SymbolSet {
        let mut result = self.model.dependencies.can_reach(values.iter().copied());
        result.extend(values.iter().copied());
        result
    }

    /// Direct supertypes of types and overridden methods of methods.
    pub fn overrides(&self, values: &SymbolSet) -> SymbolSet {
        direct(values, &self.model.inheritance, Direction::Out)
    }

    /// Direct subtypes of types and overriding methods of methods.
    pub fn overridden(&self, values: &SymbolSet) -> SymbolSet {
        direct(values, &self.model.inheritance, Direction::In)
    }

    pub fn transitive_overrides(&self, values: &SymbolSet) -> SymbolSet {
        let mut result = self
            .model
            .inheritance
            .reachable_from(values.iter().copied());
        result.extend(values.iter().copied());
        result
    }

    pub fn transitive_overridden(&self, values: &SymbolSet) -> SymbolSet {
        let mut result = self.model.inheritance.can_reach(values.iter().copied());
        result.extend(values.iter().copied());
        result
    }

    /// Container children of every member of `values`.
    pub fn expand(&self, values: &SymbolSet) -> SymbolSet {
        values
            .iter()
            .flat_map(|id| self.symbols.children(*id).iter().copied())
            .collect()
    }

    /// Every member of `values` with all of its transitive children.
    pub fn transitive_expand(&self, values: &SymbolSet) -> SymbolSet {
        values
            .iter()
            .flat_map(|id| self.symbols.descendants(*id))
            .collect()
    }

    /// Dependency-graph layers by shortest distance from `roots`, optionally
    /// bounded by the first layer that reaches `sinks`.
    pub fn distances_from(
        &self,
        roots: &SymbolSet,
        sinks: Option<&SymbolSet>,
    ) -> Vec<Vec<SymbolId>> {
        let empty = SymbolSet::default();
        self.model
            .dependencies
            .distances_from(sorted(roots), sinks.unwrap_or(&empty))
    }

    /// Dependency-graph layers by shortest distance to `sinks`, optionally
    /// bounded by the first layer that reaches `roots`.
    pub fn distances_to(&self, sinks: &SymbolSet, roots: Option<&SymbolSet>) -> Vec<Vec<SymbolId>> {
        let empty = SymbolSet::default();
        self.model
            .dependencies
            .distances_to(sorted(sinks), roots.unwrap_or(&empty))
    }

    // ========================================================================
    // Set algebra
    // ========================================================================

    pub fn union(&self, left: &SymbolSet, right: &SymbolSet) -> SymbolSet {
        left.union(right).copied().collect()
    }

    pub fn intersect(&self, left: &SymbolSet, right: &SymbolSet) -> SymbolSet {
        left.intersection(right).copied().collect()
    }

    pub fn minus(&self, left: &SymbolSet, right: &SymbolSet) -> SymbolSet {
        left.difference(right).copied().collect()
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Definitions annotated with `annotation_type` whose elements match every
    /// `(name, value)` pair. A pair matches a scalar element whose string form
    /// equals the value, or an array element containing such a value.
    pub fn annotation_set(
        &self,
        annotation_type: SymbolId,
        elements: &[(SmolStr, SmolStr)],
    ) -> SymbolSet {
        self.model
            .registry
            .definitions()
            .filter(|definition| {
                definition
                    .annotations
                    .get(&annotation_type)
                    .is_some_and(|annotation| {
                        elements.iter().all(|(name, value)| {
                            annotation
                                .elements
                                .get(name)
                                .is_some_and(|element| element.matches(value))
                        })
                    })
            })
            .map(|definition| definition.id)
            .collect()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    pub fn common_superclass(&self, a: SymbolId, b: SymbolId) -> Result<SymbolId, RegistryError> {
        self.model.registry.common_superclass(a, b)
    }

    pub fn first_missing_supertype(&self, ty: SymbolId) -> Option<SymbolId> {
        self.model.registry.first_missing_supertype(ty)
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    /// Whether code outside the defining archive can see `id`.
    ///
    /// Package-private members are visible only when their package can be
    /// extended externally, that is when neither it nor any parent package is
    /// in `UnextensiblePackages`. Protected members are also visible through
    /// non-final containing types.
    pub fn has_external_visibility(&self, id: SymbolId) -> bool {
        let Some(definition) = self.model.registry.get(id) else {
            return false;
        };
        self.is_externally_visible(definition, self.unextensible_packages())
    }

    fn is_externally_visible(
        &self,
        definition: &Definition,
        unextensible: Option<&SymbolSet>,
    ) -> bool {
        if matches!(definition.kind, DefinitionKind::Package) {
            return true;
        }
        let access = definition.access;
        if access.is_private() {
            return false;
        }
        let parent_visible = definition
            .parent()
            .and_then(|parent| self.model.registry.get(parent))
            .is_none_or(|parent| self.is_externally_visible(parent, unextensible));
        if !parent_visible {
            return false;
        }
        if access.is_public() {
            return true;
        }
        let registry = &self.model.registry;
        let package = registry.containing_package(&self.symbols, definition.id);
        let extensible = self.can_extend_externally(package, unextensible);
        if access.is_package_private() {
            return extensible;
        }
        extensible
            || registry
                .containing_type(&self.symbols, definition.id)
                .and_then(|ty| registry.get(ty))
                .is_some_and(|ty| !ty.access.is_final())
    }

    fn can_extend_externally(&self, package: SymbolId, unextensible: Option<&SymbolSet>) -> bool {
        let Some(unextensible) = unextensible else {
            return true;
        };
        let mut current = Some(package);
        while let Some(id) = current {
            if unextensible.contains(&id) {
                return false;
            }
            current = self.symbols.parent(id);
        }
        true
    }

    fn unextensible_packages(&self) -> Option<&SymbolSet> {
        self.set(UNEXTENSIBLE_PACKAGES)
    }

    // ========================================================================
    // Predefined sets
    // ========================================================================

    pub(super) fn compute_predefined(&self, rule: PredefinedSet) -> SymbolSet {
        let registry = &self.model.registry;
        let symbols = &self.symbols;
        let of_kind = |kind: SymbolKind| -> SymbolSet {
            symbols
                .iter()
                .filter(|id| *id != symbols.root() && symbols.kind(*id) == kind)
                .collect()
        };
        let defined = |keep: &dyn Fn(&Definition) -> bool| -> SymbolSet {
            registry
                .definitions()
                .filter(|definition| keep(definition))
                .map(|definition| definition.id)
                .collect()
        };
        let is_method = |d: &Definition| matches!(d.kind, DefinitionKind::Method { .. });
        let is_field = |d: &Definition| matches!(d.kind, DefinitionKind::Field { .. });
        let is_type = |d: &Definition| matches!(d.kind, DefinitionKind::Type(_));
        let named = |name: &str| -> SymbolSet {
            symbols
                .iter()
                .filter(|id| {
                    symbols.kind(*id) == SymbolKind::Method && symbols.get(*id).name() == name
                })
                .collect()
        };

        match rule {
            PredefinedSet::All => symbols.iter().filter(|id| *id != symbols.root()).collect(),
            PredefinedSet::Empty => SymbolSet::default(),
            PredefinedSet::Packages => of_kind(SymbolKind::Package),
            PredefinedSet::Types => of_kind(SymbolKind::Type),
            PredefinedSet::Methods => of_kind(SymbolKind::Method),
            PredefinedSet::Fields => of_kind(SymbolKind::Field),
            PredefinedSet::Definitions => defined(&|_| true),
            PredefinedSet::NativeMethods => defined(&|d| is_method(d) && d.access.is_native()),
            PredefinedSet::AbstractMethods => defined(&|d| is_method(d) && d.access.is_abstract()),
            PredefinedSet::Interfaces => defined(&|d| d.is_interface()),
            PredefinedSet::Classes => defined(&|d| is_type(d) && !d.access.is_interface()),
            PredefinedSet::Publics => defined(&|d| !is_package(d) && d.access.is_public()),
            PredefinedSet::Protecteds => defined(&|d| d.access.is_protected()),
            PredefinedSet::Privates => defined(&|d| d.access.is_private()),
            PredefinedSet::PackagePrivates => {
                defined(&|d| !is_package(d) && d.access.is_package_private())
            }
            PredefinedSet::Statics => defined(&|d| d.access.is_static()),
            PredefinedSet::Finals => defined(&|d| d.access.is_final()),
            PredefinedSet::SynchronizedMethods => {
                defined(&|d| is_method(d) && d.access.is_synchronized())
            }
            PredefinedSet::VolatileFields => defined(&|d| is_field(d) && d.access.is_volatile()),
            PredefinedSet::VarArgsMethods => defined(&|d| is_method(d) && d.access.is_varargs()),
            PredefinedSet::TransientFields => defined(&|d| is_field(d) && d.access.is_transient()),
            PredefinedSet::AbstractClasses => {
                defined(&|d| is_type(d) && d.access.is_abstract() && !d.access.is_interface())
            }
            PredefinedSet::Stricts => defined(&|d| d.access.is_strict()),
            PredefinedSet::Synthetics => defined(&|d| d.access.is_synthetic()),
            PredefinedSet::Externals => {
                let unextensible = self.unextensible_packages();
                defined(&|d| self.is_externally_visible(d, unextensible))
            }
            PredefinedSet::Annotations => defined(&|d| is_type(d) && d.access.is_annotation()),
            PredefinedSet::Overrides => defined(&|d| {
                is_method(d) && self.model.inheritance.out_edges(d.id).next().is_some()
            }),
            PredefinedSet::Initializers => named("<init>"),
            PredefinedSet::StaticInitializers => named("<clinit>"),
        }
    }
}

fn is_package(definition: &Definition) -> bool {
    matches!(definition.kind, DefinitionKind::Package)
}

#[derive(Clone, Copy)]
enum Direction {
    In,
    Out,
}

fn direct(values: &SymbolSet, graph: &DirectedGraph<SymbolId>, direction: Direction) -> SymbolSet {
    let mut result = SymbolSet::default();
    for value in values {
        match direction {
            Direction::Out => result.extend(graph.out_edges(*value)),
            Direction::In => result.extend(graph.in_edges(*value)),
        }
    }
    result.retain(|id| !values.contains(id));
    result
}

/// Deterministic iteration order for graph walks.
fn sorted(values: &SymbolSet) -> Vec<SymbolId> {
    let mut ids: Vec<SymbolId> = values.iter().copied().collect();
    ids.sort();
    ids
}
