//! Tests for native functions.

use assert_matches::assert_matches;

use std::sync::atomic::{AtomicI64, Ordering};

use scalar_expr::{
    env::{VariableContext, VariableSet},
    exec::Stack,
    fns::{self, CommonFunctions, FunctionResolver, MapResolver, MultiResolver, NativeFn},
    Compiler, ErrorKind, EvalError, EvalResult, Value,
};

/// Multiplies its argument by the `scale` variable.
#[derive(Debug)]
struct Scaled;

impl NativeFn for Scaled {
    fn name(&self) -> &str {
        "scaled"
    }

    fn arg_count(&self) -> usize {
        1
    }

    fn is_foldable(&self) -> bool {
        false
    }

    fn evaluate(&self, stack: &mut Stack, variables: &dyn VariableSet) -> EvalResult<()> {
        let [x] = fns::pop_args(stack, self.name())?;
        let scale = variables.get("scale").unwrap_or(Value::integer(1));
        stack.push(x * scale);
        Ok(())
    }
}

#[test]
fn common_functions_in_expressions() {
    let compiler = Compiler::with_resolver(&CommonFunctions);
    let cases = [
        ("min(3, 2.5) + max(-1, 0)", Value::float(2.5)),
        ("Clamp(15, 0, 10) - WRAP(-1, 0, 10)", Value::integer(1)),
        ("lerp(0.5, 10, 20)", Value::float(15.0)),
        ("int(7.9) / 2", Value::integer(3)),
        ("float(7) / 2", Value::float(3.5)),
        ("bool(nan)", Value::FALSE),
        ("color(255, 0, 0, 255) >>> 16 & 0xff", Value::integer(255)),
        ("int(rad2deg(pi()) + 0.5) == 180", Value::TRUE),
        ("e() > 2.718 && e() < 2.719", Value::TRUE),
    ];

    for (source, expected) in cases {
        let expr = compiler.parse_phrase(source).unwrap();
        assert!(expr.is_literal(), "{source}");
        assert_eq!(expr.evaluate().unwrap(), expected, "{source}");
    }
}

#[test]
fn functions_with_variable_args() {
    let compiler = Compiler::with_resolver(&CommonFunctions);
    let expr = compiler.parse_phrase("sin(deg2rad(angle)) * radius").unwrap();
    assert!(!expr.is_literal());

    let mut context: VariableContext = [("angle", Value::integer(90)), ("radius", Value::float(2.0))]
        .into_iter()
        .collect();
    let output = expr.evaluate_in(&mut context).unwrap().as_f64();
    assert!((output - 2.0).abs() < 1e-12);
}

#[test]
fn custom_functions_reading_variables() {
    let mut resolver = MapResolver::new();
    resolver.insert(Scaled);
    let resolver = MultiResolver::new().with(resolver).with(CommonFunctions);

    let expr = Compiler::with_resolver(&resolver)
        .parse_phrase("scaled(max(x, 2))")
        .unwrap();
    assert!(!expr.is_literal());

    let mut context = VariableContext::new();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(2));
    context.set("scale", Value::float(1.5)).set("x", Value::integer(4));
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::float(6.0));
}

#[test]
fn non_foldable_functions_are_called_on_each_evaluation() {
    static COUNTER: AtomicI64 = AtomicI64::new(0);

    let mut resolver = MapResolver::new();
    let next = fns::wrap("next", |[]: [Value; 0]| COUNTER.fetch_add(1, Ordering::SeqCst) + 1);
    resolver.insert(next.non_foldable());

    let expr = Compiler::with_resolver(&resolver)
        .parse_phrase("next() * 10")
        .unwrap();
    assert_eq!(COUNTER.load(Ordering::SeqCst), 0);
    assert_eq!(expr.evaluate().unwrap(), Value::integer(10));
    assert_eq!(expr.evaluate().unwrap(), Value::integer(20));
}

#[test]
fn native_errors_are_propagated() {
    let mut resolver = MapResolver::new();
    resolver.insert(fns::wrap("sqrt", |[x]: [Value; 1]| {
        let x = x.as_f64();
        if x < 0.0 {
            Err(format!("cannot take square root of {x}"))
        } else {
            Ok(x.sqrt())
        }
    }));

    let expr = Compiler::with_resolver(&resolver)
        .parse_phrase("sqrt(x) + 1")
        .unwrap();
    let mut context: VariableContext = [("x", Value::integer(-4))].into_iter().collect();
    let err = expr.evaluate_in(&mut context).unwrap_err();
    assert_matches!(
        &err,
        EvalError::Native { function, message }
            if function == "sqrt" && message == "cannot take square root of -4"
    );

    context.set("x", Value::integer(16));
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::float(5.0));
}

#[test]
fn function_names_ignore_case() {
    let resolver = MultiResolver::new().with(CommonFunctions);
    assert!(resolver.contains("MiN"));
    let expr = Compiler::with_resolver(&resolver)
        .parse_phrase("MIN(x, 1) + Min(1, x)")
        .unwrap();
    assert!(!expr.is_literal());
}

#[test]
fn arity_is_checked() {
    let compiler = Compiler::with_resolver(&CommonFunctions);
    for source in ["min(1)", "min(1, 2, 3)", "pi(1)", "sin()", "max 1, 2"] {
        let err = compiler.parse_phrase(source).unwrap_err();
        assert_matches!(
            err.main_diagnostic().kind(),
            ErrorKind::UnexpectedToken { .. } | ErrorKind::InvalidExpression,
            "{source}"
        );
        let note = err.diagnostics().last().unwrap();
        assert_matches!(note.kind(), ErrorKind::Note(_), "{source}");
    }
}

#[test]
fn assigning_to_function_names_is_an_error() {
    let compiler = Compiler::with_resolver(&CommonFunctions);
    let err = compiler.parse_block("x = 1; COS = 2;").unwrap_err();
    assert_matches!(
        err.main_diagnostic().kind(),
        ErrorKind::FunctionAssignment { name } if name == "COS"
    );
    assert_eq!(
        err.to_string(),
        "1:8: expected variable or expression statement; `COS` is a function name"
    );
}
