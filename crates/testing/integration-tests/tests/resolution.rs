//! Name resolution through the whole pipeline

use integration_tests::TestFixture;
use oc_resolve::SemanticError;
use oc_syntax::{Node, NodeKind, TreeBuilder};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// `depth` nested blocks, each declaring its own `x`
fn nested(b: &TreeBuilder<'_>, depth: u32) -> Vec<Node> {
    let mut inner = Vec::new();
    for level in (1..=depth).rev() {
        let line = level + 1;
        let mut statements = vec![b.vardecl(
            (line, 4),
            b.decl("int", (line, 0), (line, 4), "x"),
            Some(b.int((line, 8), i64::from(level))),
        )];
        statements.append(&mut inner);
        inner = vec![b.block((line, 0), statements)];
    }
    inner
}

#[test]
fn test_references_share_declaration_identity() {
    let fixture = TestFixture::new().unwrap();
    let mut root = fixture.build(|b| {
        vec![
            b.function(
                (1, 0),
                b.decl("int", (1, 0), (1, 4), "twice"),
                vec![b.decl("int", (1, 10), (1, 14), "n")],
                b.block(
                    (1, 17),
                    vec![b.ret(
                        (2, 4),
                        Some(b.binary(NodeKind::Add, (2, 13), b.ident((2, 11), "n"), b.ident((2, 15), "n"))),
                    )],
                ),
            ),
            b.vardecl(
                (3, 4),
                b.decl("int", (3, 0), (3, 4), "y"),
                Some(b.call((3, 13), (3, 8), "twice", vec![b.int((3, 14), 2)])),
            ),
        ]
    });
    let outputs = fixture.session.compile(&mut root);
    assert!(outputs.succeeded(), "{}", outputs.diagnostics.render());

    let function = &root.children[0];
    let param = function.children[1].children[0].declared_name().unwrap();
    let sum = &function.children[2].children[0].children[0];
    for operand in &sum.children {
        assert_eq!(operand.symbol, param.symbol);
        assert_eq!(operand.decl_loc, Some(param.loc));
    }

    let callee = &root.children[1].children[1].children[0];
    let name = function.children[0].declared_name().unwrap();
    assert_eq!(callee.symbol, name.symbol);

    let oil = outputs.oil.unwrap();
    assert!(oil.contains("        int i1 = _1_n + _1_n;\n        return i1;\n"), "{oil}");
    assert!(oil.contains("        _0_y = __twice (2);\n"), "{oil}");
}

#[test]
fn test_all_errors_are_reported_together() {
    let fixture = TestFixture::new().unwrap();
    let outputs = fixture.compile_built(|b| {
        vec![
            b.assign((1, 2), b.ident((1, 0), "a"), b.int((1, 4), 1)),
            b.assign((2, 2), b.ident((2, 0), "b"), b.int((2, 4), 2)),
        ]
    });

    let errors: Vec<&SemanticError> = outputs.diagnostics.errors().map(|d| &d.error).collect();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, SemanticError::UnresolvedIdentifier { .. }))
    );
    assert_eq!(outputs.oil, None);
}

proptest! {
    #[test]
    fn prop_nested_declarations_mangle_by_block(depth in 1u32..8) {
        let fixture = TestFixture::new().unwrap();
        let outputs = fixture.compile_built(|b| nested(b, depth));
        prop_assert!(outputs.diagnostics.is_empty());

        let oil = outputs.oil.unwrap();
        for level in 1..=depth {
            let line = format!("        int _{level}_x = {level};\n");
            prop_assert!(oil.contains(&line), "missing {:?} in\n{}", line, oil);
        }
    }
}
