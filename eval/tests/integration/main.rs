//! Integration tests for compiling and evaluating expressions.

use std::sync::Arc;

use scalar_expr::{
    env::VariableContext, exec::Stack, parse_expression_block, parse_single_expression,
    Expression, Value, ValueKind,
};

mod functions;
mod interning;
mod properties;

fn evaluate(source: &str) -> Value {
    let expr = parse_single_expression(source, None).unwrap();
    expr.evaluate().unwrap()
}

fn compile_block(source: &str) -> Arc<Expression> {
    parse_expression_block(source, None).unwrap()
}

#[test]
fn integer_division_by_zero_is_nan() {
    for source in ["5 / 0", "5 % 0", "x / 0", "-1 % (2 - 2)"] {
        let output = evaluate(source);
        assert_eq!(output.kind(), ValueKind::Float, "{source}");
        assert!(output.is_nan(), "{source}");
    }
    assert_eq!(evaluate("5.0 / 0"), Value::float(f64::INFINITY));
    assert_eq!(evaluate("-5 / 0.0"), Value::float(f64::NEG_INFINITY));
}

#[test]
fn loose_and_strict_equality() {
    assert_eq!(evaluate("1 == 1.0"), Value::TRUE);
    assert_eq!(evaluate("1 === 1.0"), Value::FALSE);
    assert_eq!(evaluate("1 !== 1.0"), Value::TRUE);
    assert_eq!(evaluate("1 != 1.0"), Value::FALSE);
    assert_eq!(evaluate("true == 1.0"), Value::TRUE);
    assert_eq!(evaluate("2 === 1 + 1"), Value::TRUE);
    assert_eq!(evaluate("nan == nan"), Value::FALSE);
    assert_eq!(evaluate("nan != nan"), Value::TRUE);
    assert_eq!(evaluate("NaN === NAN"), Value::TRUE);
}

#[test]
fn integer_arithmetic() {
    assert_eq!(evaluate("2 + 3 * 4"), Value::integer(14));
    assert_eq!(evaluate("(2 + 3) * 4"), Value::integer(20));
    assert_eq!(evaluate("7 / 2"), Value::integer(3));
    assert_eq!(evaluate("-7 % 3"), Value::integer(-1));
    assert_eq!(evaluate("10 - 4 - 3"), Value::integer(3));
    assert_eq!(evaluate("0x7fffffffffffffff + 1"), Value::integer(i64::MIN));
    assert_eq!(evaluate("0xffffffffffffffff"), Value::integer(-1));
    assert_eq!(evaluate("+-5"), Value::integer(5));
}

#[test]
fn float_arithmetic() {
    assert_eq!(evaluate("7.0 / 2"), Value::float(3.5));
    assert_eq!(evaluate("1.5e1 + 1"), Value::float(16.0));
    assert_eq!(evaluate("5.5 % 2"), Value::float(1.5));
    assert_eq!(evaluate("infinity > 1e308"), Value::TRUE);
    assert_eq!(evaluate("-infinity"), Value::float(f64::NEG_INFINITY));
}

#[test]
fn boolean_arithmetic() {
    assert_eq!(evaluate("true + false"), Value::TRUE);
    assert_eq!(evaluate("true - true"), Value::FALSE);
    assert_eq!(evaluate("true - false"), Value::TRUE);
    assert_eq!(evaluate("true * false"), Value::FALSE);
    assert_eq!(evaluate("false / true"), Value::FALSE);
    assert_eq!(evaluate("-true"), Value::FALSE);
    assert_eq!(evaluate("~false"), Value::TRUE);
    // Booleans are promoted to integers with all bits set for `true`.
    assert_eq!(evaluate("true + 1"), Value::integer(0));
    assert_eq!(evaluate("true + 0.5"), Value::float(1.5));
}

#[test]
fn bitwise_operations() {
    assert_eq!(evaluate("6 & 3"), Value::integer(2));
    assert_eq!(evaluate("6 | 3"), Value::integer(7));
    assert_eq!(evaluate("6 ^ 3"), Value::integer(5));
    assert_eq!(evaluate("~0"), Value::integer(-1));
    assert_eq!(evaluate("1 | 2 ^ 3 & 4"), Value::integer(3));

    let output = evaluate("1.5 | 0");
    assert_eq!(output.kind(), ValueKind::Float);
    assert_eq!(output.raw_bits(), 1.5_f64.to_bits());
    let output = evaluate("-0.0 ^ 0.0");
    assert_eq!(output, Value::float(-0.0));
}

#[test]
fn shifts() {
    assert_eq!(evaluate("1 << 4"), Value::integer(16));
    assert_eq!(evaluate("1 << 65"), Value::integer(2));
    assert_eq!(evaluate("-8 >> 1"), Value::integer(-4));
    assert_eq!(evaluate("-1 >>> 60"), Value::integer(15));
    assert_eq!(evaluate("1 + 1 << 2"), Value::integer(8));
    assert_eq!(evaluate("true << 3"), Value::TRUE);

    let output = evaluate("1.0 << 1");
    assert_eq!(output.kind(), ValueKind::Float);
    assert_eq!(output.raw_bits(), 1.0_f64.to_bits() << 1);
}

#[test]
fn comparisons_and_logic() {
    assert_eq!(evaluate("1 < 2 == 2 > 1"), Value::TRUE);
    assert_eq!(evaluate("2 <= 2.0 && 3 >= 4"), Value::FALSE);
    assert_eq!(evaluate("0 || 0.5"), Value::TRUE);
    assert_eq!(evaluate("1 && nan"), Value::FALSE);
    assert_eq!(evaluate("nan < 1 || nan >= 1"), Value::FALSE);
    assert_eq!(evaluate("!0"), Value::integer(-1));
    assert_eq!(evaluate("!2"), Value::integer(0));

    let output = evaluate("!nan");
    assert_eq!(output, Value::float(1.0));
    assert!(output.as_bool());
}

#[test]
fn variables_in_phrases() {
    let expr = parse_single_expression("x * 2 + y", None).unwrap();
    let mut context: VariableContext = [("x", Value::integer(4)), ("y", Value::float(0.5))]
        .into_iter()
        .collect();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::float(8.5));

    context.remove("y");
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(8));
    // Undefined variables are `false`.
    assert_eq!(expr.evaluate().unwrap(), Value::integer(0));
}

#[test]
fn branching() {
    let expr = compile_block("if (1 > 0) { return 5; } else { return 10; }");
    assert_eq!(expr.evaluate().unwrap(), Value::integer(5));
    let expr = compile_block("if (1 < 0) { return 5; } else { return 10; }");
    assert_eq!(expr.evaluate().unwrap(), Value::integer(10));

    let expr = compile_block("if (x) return 1; else if (y) return 2; else return 3;");
    let mut context = VariableContext::new();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(3));
    context.set("y", Value::float(0.1));
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(2));
    context.set("x", Value::TRUE);
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(1));
}

#[test]
fn assignment_and_read() {
    let expr = compile_block("x = 3; return x + 2;");
    let mut context = VariableContext::new();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(5));
    assert_eq!(context["x"], Value::integer(3));
    assert_eq!(context.return_value(), Some(Value::integer(5)));
}

#[test]
fn return_stops_evaluation() {
    let expr = compile_block(
        "{
            if (x) { return 1; }
            y = 2;
            return y;
        }",
    );
    let mut context: VariableContext = [("x", Value::TRUE)].into_iter().collect();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(1));
    assert!(!context.contains("y"));

    context.set("x", Value::FALSE);
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::integer(2));
    assert_eq!(context["y"], Value::integer(2));
}

#[test]
fn block_without_return_evaluates_to_false() {
    let expr = compile_block("x = 1; y = x + 1;");
    let mut context = VariableContext::new();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::FALSE);
    assert_eq!(context["y"], Value::integer(2));
    assert_eq!(context.return_value(), None);

    let expr = compile_block("");
    assert_eq!(expr.evaluate().unwrap(), Value::FALSE);
}

#[test]
fn comments_and_keyword_case() {
    let expr = compile_block(
        "// Toggles the flag
        IF (flag == FALSE) { flag = TRUE; } ELSE { flag = false; } /* done */
        Return flag;",
    );
    let mut context = VariableContext::new();
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::TRUE);
    assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::FALSE);
}

#[test]
fn reusing_stack_and_context() {
    let expr = compile_block("counter = counter + 1; return counter * step;");
    let mut stack = Stack::with_capacity(1);
    let mut context = VariableContext::new();
    context.set("step", Value::float(0.25));

    let mut last_output = Value::FALSE;
    for _ in 0..100 {
        last_output = expr.evaluate_with(&mut stack, &mut context).unwrap();
    }
    assert_eq!(context["counter"], Value::integer(100));
    assert_eq!(last_output, Value::float(25.0));
}

#[test]
fn parse_errors() {
    let err = parse_expression_block("x = 1 +;", None).unwrap_err();
    assert_eq!(err.to_string(), "1:8: expected valid expression");

    let err = parse_single_expression("(1 + 2))", None).unwrap_err();
    assert_eq!(err.to_string(), "1:8: expected end of input, got `)`");

    let err = parse_single_expression("x = 1", None).unwrap_err();
    assert_eq!(err.to_string(), "1:3: expected end of input, got `=`");

    let err = parse_expression_block("if (x) { return 1;", None).unwrap_err();
    assert_eq!(err.to_string(), "expected `}`, got end of input");

    let err = parse_single_expression("1 + ä", None).unwrap_err();
    assert_eq!(err.main_diagnostic().location().unwrap().column, 5);
}
