/// Definitions of identifiers and JVM member resolution over them
mod access;
mod definition;
mod hierarchy;
mod resolve;
mod store;

pub use access::AccessFlags;
pub use definition::{Annotation, Definition, DefinitionKind, TypeDefinition};
pub use store::{Registry, RegistryError};

#[cfg(test)]
mod tests;
