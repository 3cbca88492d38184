use tracing::debug;

use crate::semantic::graphs::DirectedGraph;
use crate::semantic::registry::{DefinitionKind, Registry};
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

/// Builds the inheritance graph from the registry.
///
/// Type edges point from a type to its superclass and to each interface it
/// implements; interfaces also point to the root type. Override edges point from
/// an instance method to every method it overrides further up the hierarchy.
pub fn build_inheritance_graph(
    symbols: &SymbolTable,
    registry: &Registry,
) -> DirectedGraph<SymbolId> {
    let mut graph = DirectedGraph::new();
    let object = registry.object();

    for definition in registry.definitions() {
        let Some(ty) = definition.as_type() else {
            continue;
        };
        if let Some(super_type) = ty.super_type {
            graph.add_edge(definition.id, super_type);
        }
        for interface in &ty.interfaces {
            graph.add_edge(definition.id, *interface);
        }
        if definition.is_interface() && definition.id != object {
            graph.add_edge(definition.id, object);
        }
    }

    let mut overrides = 0;
    for definition in registry.definitions() {
        if !matches!(definition.kind, DefinitionKind::Method { .. })
            || definition.access.is_static()
        {
            continue;
        }
        let method = symbols.get(definition.id);
        let (Some(owner), Some(descriptor)) = (method.owner(), method.descriptor()) else {
            continue;
        };
        if method.name() == "<init>" {
            continue;
        }
        for ancestor in graph.reachable_from([owner]) {
            if ancestor == owner {
                continue;
            }
            if let Some(overridden) =
                registry.lookup_method(symbols, ancestor, method.name(), descriptor)
            {
                graph.add_edge(definition.id, overridden);
                overrides += 1;
            }
        }
    }

    debug!(
        "[INHERITANCE] {} vertices, {} edges ({} overrides)",
        graph.vertex_count(),
        graph.edge_count(),
        overrides
    );
    graph
}
