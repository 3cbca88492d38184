use crate::classfile::{Instruction, LocalVariable, OuterClass, opcodes};
use crate::semantic::registry::AccessFlags;

use super::{Model, class, inner_class, member, with_code};

#[test]
fn test_type_and_member_signature_edges() {
    let mut model = Model::new();
    let mut a = class("p/A", Some("p/B"), &["p/I"]);
    a.fields
        .push(member(AccessFlags::PRIVATE, "names", "[Lp/Name;"));
    a.fields.push(member(AccessFlags::PRIVATE, "count", "I"));
    let mut call = member(AccessFlags::PUBLIC, "call", "(Lp/Arg;J)Lp/Ret;");
    call.exceptions.push("p/Oops".to_string());
    a.methods.push(call);
    let classes = [a];
    model.define("lib.jar", &classes);
    model.link("lib.jar", &classes).unwrap();

    assert_eq!(model.out_names(model.ty("p/A")), vec!["p/B", "p/I"]);
    assert_eq!(
        model.out_names(model.field("p/A", "names", "[Lp/Name;")),
        vec!["p/A", "p/Name"]
    );
    assert_eq!(
        model.out_names(model.field("p/A", "count", "I")),
        vec!["p/A"]
    );
    assert_eq!(
        model.out_names(model.method("p/A", "call", "(Lp/Arg;J)Lp/Ret;")),
        vec!["p/A", "p/Arg", "p/Oops", "p/Ret"]
    );
}

#[test]
fn test_static_initializer_is_used_by_its_type() {
    let mut model = Model::new();
    let mut a = class("p/A", None, &[]);
    a.methods
        .push(member(AccessFlags::STATIC, "<clinit>", "()V"));
    let classes = [a];
    model.define("lib.jar", &classes);
    model.link("lib.jar", &classes).unwrap();

    let clinit = model.method("p/A", "<clinit>", "()V");
    assert!(model.dependencies.contains_edge(model.ty("p/A"), clinit));
}

#[test]
fn test_instruction_edges() {
    let mut model = Model::new();
    let mut b = class("p/B", None, &[]);
    b.fields.push(member(AccessFlags::PUBLIC, "shared", "I"));
    let mut a = class("p/A", Some("p/B"), &[]);
    let mut body = with_code(
        member(AccessFlags::PUBLIC, "work", "()V"),
        vec![
            Instruction::Field {
                opcode: opcodes::GETFIELD,
                owner: "p/A".into(),
                name: "shared".into(),
                descriptor: "I".into(),
            },
            Instruction::Method {
                opcode: opcodes::INVOKESTATIC,
                owner: "q/Util".into(),
                name: "help".into(),
                descriptor: "()V".into(),
            },
            Instruction::Method {
                opcode: opcodes::INVOKEVIRTUAL,
                owner: "[Lp/Elem;".into(),
                name: "clone".into(),
                descriptor: "()Ljava/lang/Object;".into(),
            },
            Instruction::Type {
                opcode: opcodes::CHECKCAST,
                operand: "[Lp/Cast;".into(),
            },
            Instruction::Type {
                opcode: opcodes::NEW,
                operand: "p/New".into(),
            },
            Instruction::MultiANewArray {
                descriptor: "[[Lp/Grid;".into(),
                dimensions: 2,
            },
        ],
    );
    if let Some(code) = body.code.as_mut() {
        code.catch_types = vec![Some("p/Caught".into()), None];
        code.local_variables = vec![LocalVariable {
            name: "local".into(),
            descriptor: "Lp/Local;".into(),
        }];
    }
    a.methods.push(body);
    let classes = [b, a];
    model.define("lib.jar", &classes);
    model.link("lib.jar", &classes).unwrap();

    assert_eq!(
        model.out_names(model.method("p/A", "work", "()V")),
        vec![
            "p/A",
            "p/B.shared.I",
            "p/Cast",
            "p/Caught",
            "p/Elem",
            "p/Grid",
            "p/Local",
            "p/New",
            "q/Util.help.()V",
        ]
    );
}

#[test]
fn test_classes_from_other_files_are_skipped() {
    let mut model = Model::new();
    let a = class("p/A", Some("p/B"), &[]);
    model.define("one.jar", &[a.clone()]);
    model.link("two.jar", &[a]).unwrap();

    assert_eq!(model.dependencies.edge_count(), 0);
}

#[test]
fn test_inner_class_attribute_nests_type() {
    let mut model = Model::new();
    let mut outer = class("p/Outer", None, &[]);
    outer
        .inner_classes
        .push(inner_class("p/Outer$Inner", Some("p/Outer")));
    let inner = class("p/Outer$Inner", None, &[]);
    let classes = [outer, inner];
    model.define("lib.jar", &classes);
    model.link("lib.jar", &classes).unwrap();

    let (outer, inner) = (model.ty("p/Outer"), model.ty("p/Outer$Inner"));
    assert!(model.dependencies.contains_edge(inner, outer));
    assert_eq!(model.symbols.parent(inner), Some(outer));
    assert_eq!(model.registry.get(inner).unwrap().parent(), Some(outer));
    assert!(!model.symbols.is_provisional(inner));
}

#[test]
fn test_anonymous_inner_class_uses_enclosing_method() {
    let mut model = Model::new();
    let outer = class("p/Outer", None, &[]);
    let mut anonymous = class("p/Outer$1", None, &[]);
    anonymous.inner_classes.push(inner_class("p/Outer$1", None));
    anonymous.outer_class = Some(OuterClass {
        owner: "p/Outer".into(),
        method_name: Some("make".into()),
        method_descriptor: Some("()V".into()),
    });
    let classes = [outer, anonymous];
    model.define("lib.jar", &classes);
    model.link("lib.jar", &classes).unwrap();

    assert_eq!(
        model.symbols.parent(model.ty("p/Outer$1")),
        Some(model.ty("p/Outer"))
    );
}

#[test]
fn test_split_nesting_is_fatal() {
    let mut model = Model::new();
    let mut outer = class("p/Outer", None, &[]);
    outer
        .inner_classes
        .push(inner_class("p/Outer$Inner", Some("p/Outer")));
    model.define("inner.jar", &[class("p/Outer$Inner", None, &[])]);
    model.define("outer.jar", &[outer.clone()]);

    let err = model.link("outer.jar", &[outer]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Inner Type 'p/Outer$Inner' contained in file 'inner.jar' is in a different file than outer type 'p/Outer' in file 'outer.jar'."
    );
}
