use crate::semantic::registry::RegistryError;

use super::Model;

#[test]
fn test_first_missing_supertype_reports_superclass() {
    let mut model = Model::new();
    let a = model.class("p/A", Some("p/Gone"), &[]);
    let gone = model.symbols.existing_type("p/Gone").unwrap();
    assert_eq!(model.registry.first_missing_supertype(a), Some(gone));
}

#[test]
fn test_first_missing_supertype_reports_interface() {
    let mut model = Model::new();
    model.class("p/Base", None, &[]);
    let a = model.class("p/A", Some("p/Base"), &["p/MissingIface"]);
    let missing = model.symbols.existing_type("p/MissingIface").unwrap();
    assert_eq!(model.registry.first_missing_supertype(a), Some(missing));
}

#[test]
fn test_first_missing_supertype_complete_chain() {
    let mut model = Model::new();
    model.class("java/lang/Object", None, &[]);
    model.interface("p/I", &[]);
    let a = model.class("p/A", Some("java/lang/Object"), &["p/I"]);
    assert_eq!(model.registry.first_missing_supertype(a), None);
}

#[test]
fn test_subclass_and_interface_queries() {
    let mut model = Model::new();
    let top = model.interface("p/Top", &[]);
    model.interface("p/Mid", &["p/Top"]);
    let base = model.class("p/Base", Some("java/lang/Object"), &["p/Mid"]);
    let derived = model.class("p/Derived", Some("p/Base"), &[]);
    let object = model.symbols.object();

    assert!(model.registry.is_subclass_of(derived, base).unwrap());
    assert!(model.registry.is_subclass_of(derived, object).unwrap());
    assert!(!model.registry.is_subclass_of(base, derived).unwrap());
    assert!(model.registry.implements_interface(derived, top).unwrap());
    assert!(model.registry.is_assignable_from(top, derived).unwrap());
    assert!(model.registry.is_assignable_from(object, top).unwrap());
    assert!(!model.registry.is_assignable_from(derived, top).unwrap());
}

#[test]
fn test_common_superclass() {
    let mut model = Model::new();
    let base = model.class("p/Base", Some("java/lang/Object"), &[]);
    let left = model.class("p/Left", Some("p/Base"), &[]);
    let right = model.class("p/Right", Some("p/Base"), &[]);
    let leaf = model.class("p/Leaf", Some("p/Left"), &[]);
    let i = model.interface("p/I", &[]);
    let j = model.interface("p/J", &[]);
    let object = model.symbols.object();

    assert_eq!(model.registry.common_superclass(leaf, right).unwrap(), base);
    assert_eq!(model.registry.common_superclass(leaf, left).unwrap(), left);
    assert_eq!(model.registry.common_superclass(left, leaf).unwrap(), left);
    assert_eq!(model.registry.common_superclass(i, j).unwrap(), object);
    assert_eq!(model.registry.common_superclass(i, leaf).unwrap(), object);
}

#[test]
fn test_common_superclass_missing_definition() {
    let mut model = Model::new();
    let a = model.class("p/A", Some("p/Gone"), &[]);
    let b = model.class("p/B", Some("java/lang/Object"), &[]);
    let gone = model.symbols.existing_type("p/Gone").unwrap();
    assert_eq!(
        model.registry.common_superclass(a, b),
        Err(RegistryError::Missing(gone))
    );
}
