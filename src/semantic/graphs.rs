/// Directed graphs over identifiers, with reachability and distance layering
mod directed;

pub use directed::DirectedGraph;
