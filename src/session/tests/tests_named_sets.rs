use rstest::rstest;

use crate::session::{Session, SetError, UNEXTENSIBLE_PACKAGES};

use super::{names, types};

#[rstest]
#[case("Foo", true)]
#[case("myList", true)]
#[case("list2", true)]
#[case("foo", true)]
#[case("", false)]
#[case("a.B", false)]
#[case("p/A", false)]
#[case("Definitions", false)]
#[case("All", false)]
fn test_mutable_set_names(#[case] name: &str, #[case] valid: bool) {
    let session = Session::default();
    assert_eq!(session.is_valid_mutable_set_name(name), valid, "{name}");
}

#[test]
fn test_predefined_sets_are_registered() {
    let session = Session::default();
    assert!(session.has_set("Definitions"));
    assert!(session.is_predefined_set("Externals"));
    assert!(!session.has_set(UNEXTENSIBLE_PACKAGES));
    assert!(session.set("Empty").unwrap().is_empty());
}

#[test]
fn test_create_then_add_and_remove() {
    let mut session = Session::default();
    let values = types(&mut session, &["p/A", "p/B"]);
    session.create_set("Foo").unwrap();
    assert!(session.set("Foo").unwrap().is_empty());

    session.add_to_set("Foo", &values).unwrap();
    assert_eq!(names(&session, session.set("Foo").unwrap()), ["p/A", "p/B"]);

    let b = types(&mut session, &["p/B"]);
    session.remove_from_set("Foo", &b).unwrap();
    assert_eq!(names(&session, session.set("Foo").unwrap()), ["p/A"]);
}

#[test]
fn test_create_rejects_existing_and_reserved_names() {
    let mut session = Session::default();
    session.create_set("Foo").unwrap();
    assert_eq!(
        session.create_set("Foo"),
        Err(SetError::InvalidNewName("Foo".into()))
    );
    assert_eq!(
        session.create_set("Definitions"),
        Err(SetError::Predefined("Definitions".into()))
    );
    assert!(session.is_predefined_set("Definitions"));
}

#[test]
fn test_predefined_sets_cannot_be_modified() {
    let mut session = Session::default();
    let values = types(&mut session, &["p/A"]);
    let err = session.add_to_set("Types", &values).unwrap_err();
    assert_eq!(err.to_string(), "Cannot modify predefined set 'Types'.");
    assert_eq!(
        session.delete_set("All"),
        Err(SetError::Predefined("All".into()))
    );
    assert_eq!(
        session.assign_set("Types", values),
        Err(SetError::InvalidName("Types".into()))
    );
}

#[test]
fn test_missing_set_errors() {
    let mut session = Session::default();
    let err = session.delete_set("Nope").unwrap_err();
    assert_eq!(err.to_string(), "No set named 'Nope'.");
}

#[test]
fn test_assign_replaces_contents() {
    let mut session = Session::default();
    let first = types(&mut session, &["p/A"]);
    let second = types(&mut session, &["p/B", "p/C"]);
    session.assign_set("Foo", first).unwrap();
    session.assign_set("Foo", second.clone()).unwrap();
    assert_eq!(session.set("Foo"), Some(&second));
}

#[test]
fn test_move_between_sets() {
    let mut session = Session::default();
    let both = types(&mut session, &["p/A", "p/B"]);
    let a = types(&mut session, &["p/A"]);
    session.assign_set("Left", both).unwrap();
    session.create_set("Right").unwrap();

    session.move_between("Left", "Right", &a).unwrap();

    assert_eq!(names(&session, session.set("Left").unwrap()), ["p/B"]);
    assert_eq!(names(&session, session.set("Right").unwrap()), ["p/A"]);
}

#[test]
fn test_move_into_predefined_set_changes_nothing() {
    let mut session = Session::default();
    let a = types(&mut session, &["p/A"]);
    session.assign_set("Left", a.clone()).unwrap();

    assert!(session.move_between("Left", "Types", &a).is_err());
    assert_eq!(session.set("Left"), Some(&a));
}

#[test]
fn test_delete_set() {
    let mut session = Session::default();
    session.create_set("Foo").unwrap();
    session.delete_set("Foo").unwrap();
    assert!(!session.has_set("Foo"));
    assert!(session.is_valid_new_set_name("Foo"));
}
