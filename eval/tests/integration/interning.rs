//! Tests for expression digests and interning.

use std::{sync::Arc, thread};

use scalar_expr::{
    fns::CommonFunctions, parse_single_expression, CompileOptions, Compiler, Expression,
    InternTable, Value,
};

#[test]
fn reparsing_yields_canonical_instance() {
    let first = parse_single_expression("a * (b + 1)", None).unwrap();
    let second = parse_single_expression("a*(b+1)", None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.digest(), second.digest());
    assert_eq!(first.digest(), first.compute_digest());
}

#[test]
fn interning_is_idempotent() {
    let compiler = Compiler::new().with_options(CompileOptions::FOLD_CONSTANTS);
    let expr = compiler.parse_phrase("u - v / 3").unwrap();
    let interned = Arc::clone(&expr).intern();
    assert!(Arc::ptr_eq(&interned, &expr));
    let interned_again = interned.intern();
    assert!(Arc::ptr_eq(&interned_again, &expr));

    let separate = compiler.parse_phrase("u - v / 3").unwrap();
    assert!(!Arc::ptr_eq(&separate, &expr));
    assert!(Arc::ptr_eq(&separate.intern(), &expr));
}

#[test]
fn digests_reflect_compiled_form() {
    let digest = |source: &str| {
        Compiler::with_resolver(&CommonFunctions)
            .parse_phrase(source)
            .unwrap()
            .digest()
    };

    assert_ne!(digest("x + 1"), digest("x + 2"));
    assert_ne!(digest("x - 1"), digest("1 - x"));
    assert_ne!(digest("x + 1"), digest("x + 1.0"));
    assert_ne!(digest("x"), digest("X"));
    assert_eq!(digest("MAX(x, 1)"), digest("max(x,1)"));
    assert_eq!(digest("x + (1)"), digest("((x)) + 1"));
}

#[test]
fn folded_expressions_share_constants() {
    let one = parse_single_expression("3 - 2", None).unwrap();
    let other_one = parse_single_expression("1 * 1", None).unwrap();
    assert!(Arc::ptr_eq(&one, &other_one));
    assert_eq!(one.to_string(), "1");

    let digest = Expression::literal(Value::integer(1)).digest();
    let canonical = InternTable::global().get(&digest).unwrap();
    assert!(Arc::ptr_eq(&canonical, &one));

    let truth = parse_single_expression("2 > 1 && 3 > 2", None).unwrap();
    assert_eq!(truth.as_literal(), Some(Value::TRUE));
    let nan = parse_single_expression("0 / 0", None).unwrap();
    assert!(nan.as_literal().unwrap().is_nan());
}

#[test]
fn displaying_expressions() {
    // Interned instances keep the source of the first inserted copy, so intern is off here.
    let compiler = Compiler::new().with_options(CompileOptions::FOLD_CONSTANTS);
    let expr = compiler.parse_phrase("x  +  1").unwrap();
    assert_eq!(expr.to_string(), "x  +  1");

    let tokens = scalar_expr_lexer::tokenize("y * 7").unwrap();
    let expr = Compiler::new()
        .with_options(CompileOptions::empty())
        .compile_phrase(tokens)
        .unwrap();
    assert_eq!(expr.to_string(), format!("digest:{}", expr.digest()));
}

#[test]
fn concurrent_interning_converges() {
    const THREADS: usize = 8;

    let table = InternTable::new();
    let canonical: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let table = &table;
                scope.spawn(move || {
                    let compiler = Compiler::new().with_options(CompileOptions::FOLD_CONSTANTS);
                    let padding = " ".repeat(i);
                    let source = format!("speed{padding}* dt + offset");
                    let expr = compiler.parse_phrase(&source).unwrap();
                    table.intern(expr)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(table.len(), 1);
    for expr in &canonical[1..] {
        assert!(Arc::ptr_eq(expr, &canonical[0]));
    }
}

#[test]
fn concurrent_digest_computation() {
    let compiler = Compiler::new().with_options(CompileOptions::empty());
    let expr = compiler.parse_phrase("a & b | c ^ d").unwrap();
    let digests: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| expr.digest())).collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert!(digests.iter().all(|digest| *digest == expr.compute_digest()));
}
