//! Randomized and table-driven checks of evaluation laws.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use scalar_expr::{
    env::VariableContext,
    exec::{BinaryOp, Stack},
    fns::CommonFunctions,
    CompileOptions, Compiler, Value, ValueKind,
};

const SEED: u64 = 123;
const SAMPLE_COUNT: usize = 2_000;

const PROMOTING_OPS: [BinaryOp; 16] = [
    BinaryOp::Add,
    BinaryOp::Subtract,
    BinaryOp::Multiply,
    BinaryOp::Divide,
    BinaryOp::Modulo,
    BinaryOp::And,
    BinaryOp::Or,
    BinaryOp::Xor,
    BinaryOp::LogicalAnd,
    BinaryOp::LogicalOr,
    BinaryOp::Less,
    BinaryOp::LessOrEqual,
    BinaryOp::Greater,
    BinaryOp::GreaterOrEqual,
    BinaryOp::Equal,
    BinaryOp::NotEqual,
];

fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Less
            | BinaryOp::LessOrEqual
            | BinaryOp::Greater
            | BinaryOp::GreaterOrEqual
            | BinaryOp::Equal
            | BinaryOp::NotEqual
    )
}

fn random_value(rng: &mut impl Rng) -> Value {
    match rng.gen_range(0..3) {
        0 => Value::boolean(rng.gen()),
        1 => {
            let special = [0, 1, -1, i64::MIN, i64::MAX];
            if rng.gen_bool(0.2) {
                Value::integer(*special.choose(rng).unwrap())
            } else {
                Value::integer(rng.gen_range(-1_000..=1_000))
            }
        }
        _ => {
            let special = [0.0, -0.0, 1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY];
            if rng.gen_bool(0.2) {
                Value::float(*special.choose(rng).unwrap())
            } else {
                Value::float(rng.gen_range(-1_000.0..1_000.0))
            }
        }
    }
}

#[test]
fn binary_ops_promote_operands_to_wider_kind() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut checked_pairs = 0;
    while checked_pairs < SAMPLE_COUNT {
        let (lhs, rhs) = (random_value(&mut rng), random_value(&mut rng));
        if lhs.kind() == rhs.kind() {
            continue;
        }
        checked_pairs += 1;

        let kind = lhs.kind().wider(rhs.kind());
        let (promoted_lhs, promoted_rhs) = (lhs.convert_to(kind), rhs.convert_to(kind));
        for op in PROMOTING_OPS {
            // Comparisons use float interpretations, for which `true` is 1 rather than -1.
            if is_comparison(op) && lhs.kind().min(rhs.kind()) == ValueKind::Boolean {
                continue;
            }
            assert_eq!(
                op.apply(lhs, rhs),
                op.apply(promoted_lhs, promoted_rhs),
                "{lhs:?} {op} {rhs:?}"
            );
        }
    }
}

#[test]
fn shifts_use_left_operand_kind() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..SAMPLE_COUNT {
        let (lhs, rhs) = (random_value(&mut rng), random_value(&mut rng));
        for op in [BinaryOp::LeftShift, BinaryOp::RightShift, BinaryOp::RightShiftPadded] {
            assert_eq!(op.apply(lhs, rhs).kind(), lhs.kind(), "{lhs:?} {op} {rhs:?}");
        }
    }
}

const FOLDABLE_PHRASES: &[&str] = &[
    "1 + 2 * 3 - 4 / 5",
    "(7 % 3) << 2 | 1",
    "-0x10 >> 2 ^ ~7",
    "1.5 * 2 == 3 && !(2 > 3)",
    "true + 2 - false * 0.5",
    "5 / 0 !== 5 % 0 || nan === nan",
    "min(2, 1.5) + max(infinity, 0) * 0",
    "clamp(lerp(0.25, -8, 8), -1, 1) >>> 1",
    "color(1, 2, 3, 4) & 0xffff | int(sin(pi() / 2) * 100)",
    "wrap(-7, 0, 5) + wrap(7.5, 0, 5) - bool(0.0)",
    "colorf(1, 0.5, 0.25, 1) !== 0",
    "float(1) / 3 + deg2rad(rad2deg(e()))",
];

#[test]
fn folding_does_not_change_outputs() {
    let folding = Compiler::with_resolver(&CommonFunctions);
    let non_folding =
        Compiler::with_resolver(&CommonFunctions).with_options(CompileOptions::empty());

    for &source in FOLDABLE_PHRASES {
        let folded = folding.parse_phrase(source).unwrap();
        assert!(folded.is_literal(), "{source}");
        let unfolded = non_folding.parse_phrase(source).unwrap();
        assert!(!unfolded.is_literal(), "{source}");

        assert_eq!(
            folded.evaluate().unwrap(),
            unfolded.evaluate().unwrap(),
            "{source}"
        );
    }
}

#[test]
fn compiled_phrases_are_stack_balanced() {
    let compiler = Compiler::with_resolver(&CommonFunctions).with_options(CompileOptions::empty());
    let phrases = FOLDABLE_PHRASES
        .iter()
        .copied()
        .chain(["x", "-x * (y + 1)", "max(x, y) < z || !w", "sin(x) + cos(y)"]);

    for source in phrases {
        let expr = compiler.parse_phrase(source).unwrap();
        let root = expr.root().unwrap();
        let mut stack = Stack::new();
        let mut context = VariableContext::new();
        let flow = root.execute(&mut stack, &mut context).unwrap();
        assert!(flow.is_continue(), "{source}");
        assert_eq!(stack.len(), 1, "{source}");
        assert!(context.is_empty(), "{source}");
    }
}
