use super::*;
use crate::expression::dsl::{
    abs, add, constant, cos, div, log, max, min, mul, neg, pow, random, sin, static_cast, sub,
    variable,
};
use crate::expression::variable::ReferenceType;
use crate::foundation::core::{PlanetType, StarType};

fn eval<T: RefValue>(node: &ValueRef<T>) -> ValueRefResult<T> {
    node.eval_without_context()
}

#[test]
fn integer_arithmetic() {
    assert_eq!(eval(&mul(add(constant(1), constant(2)), constant(3))).unwrap(), 9);
    assert_eq!(eval(&sub(constant(1), constant(5))).unwrap(), -4);
    assert_eq!(eval(&div(constant(7), constant(2))).unwrap(), 3);
    assert_eq!(eval(&div(constant(-7), constant(2))).unwrap(), -3);
    assert_eq!(eval(&pow(constant(2), constant(10))).unwrap(), 1024);
    assert_eq!(eval(&pow(constant(2), constant(-1))).unwrap(), 0);
    assert_eq!(eval(&neg(constant(4))).unwrap(), -4);
    assert_eq!(eval(&abs(constant(-4))).unwrap(), 4);
    assert_eq!(eval(&min(constant(4), constant(-1))).unwrap(), -1);
    assert_eq!(eval(&max(constant(4), constant(-1))).unwrap(), 4);
    assert_eq!(eval(&log(constant(10))).unwrap(), 2);
}

#[test]
fn integer_errors() {
    let err = eval(&div(constant(1), constant(0))).unwrap_err();
    assert!(err.to_string().contains("division by zero"));
    assert!(matches!(
        eval(&add(constant(i32::MAX), constant(1))).unwrap_err(),
        ValueRefError::Arithmetic(_)
    ));
    assert!(eval(&div(constant(i32::MIN), constant(-1))).is_err());
    assert!(eval(&neg(constant(i32::MIN))).is_err());
    assert!(eval(&pow(constant(0), constant(-1))).is_err());
    assert!(eval(&log(constant(0))).is_err());
}

#[test]
fn double_arithmetic() {
    assert_eq!(eval(&div(constant(1.0), constant(4.0))).unwrap(), 0.25);
    assert!((eval(&log(constant(std::f64::consts::E))).unwrap() - 1.0).abs() < 1e-12);
    assert!(eval(&sin(constant(0.0))).unwrap().abs() < 1e-12);
    assert_eq!(eval(&cos(constant(0.0))).unwrap(), 1.0);
    assert!((eval(&pow(constant(9.0), constant(0.5))).unwrap() - 3.0).abs() < 1e-12);
}

#[test]
fn double_errors() {
    assert!(eval(&div(constant(1.0), constant(0.0))).is_err());
    assert!(eval(&log(constant(-1.0))).is_err());
    assert!(eval(&pow(constant(-8.0), constant(1.0 / 3.0))).is_err());
    assert!(eval(&mul(constant(f64::MAX), constant(2.0))).is_err());
}

#[test]
fn random_is_deterministic_and_bounded() {
    let node = random(constant(1), constant(6));
    let ctx = ScriptingContext::empty().with_seed(1234);
    let first = node.eval(&ctx).unwrap();
    assert!((1..=6).contains(&first));
    assert_eq!(node.eval(&ctx).unwrap(), first);

    for seed in 0..200 {
        let v = node.eval(&ScriptingContext::empty().with_seed(seed)).unwrap();
        assert!((1..=6).contains(&v));
    }

    let swapped = random(constant(6.0), constant(2.0));
    for seed in 0..200 {
        let v = swapped
            .eval(&ScriptingContext::empty().with_seed(seed))
            .unwrap();
        assert!((2.0..6.0).contains(&v));
    }

    let point = random(constant(3), constant(3));
    assert_eq!(eval(&point).unwrap(), 3);
}

#[test]
fn random_over_full_double_range_stays_finite() {
    let wide = random(constant(-f64::MAX), constant(f64::MAX));
    for seed in 0..64 {
        let v = wide.eval(&ScriptingContext::empty().with_seed(seed)).unwrap();
        assert!(v.is_finite());
    }

    let unbounded = random(constant(f64::NEG_INFINITY), constant(0.0));
    assert!(matches!(
        eval(&unbounded).unwrap_err(),
        ValueRefError::Arithmetic(_)
    ));
}

#[test]
fn text_operations() {
    let hello = add(constant("Hello, ".to_owned()), constant("world".to_owned()));
    assert_eq!(eval(&hello).unwrap(), "Hello, world");
    assert_eq!(
        eval(&min(constant("b".to_owned()), constant("a".to_owned()))).unwrap(),
        "a"
    );
    let err = eval(&mul(constant("a".to_owned()), constant("b".to_owned()))).unwrap_err();
    assert!(matches!(err, ValueRefError::InvalidOperation(_)));
}

#[test]
fn enum_operations() {
    assert_eq!(
        eval(&max(constant(PlanetType::Swamp), constant(PlanetType::Ocean))).unwrap(),
        PlanetType::Ocean
    );
    assert!(eval(&add(constant(StarType::Red), constant(StarType::Blue))).is_err());
}

#[test]
fn constructors_check_arity() {
    assert!(Operation::binary(OpType::Plus, constant(1), constant(2)).is_ok());
    assert!(Operation::binary(OpType::Negate, constant(1), constant(2)).is_err());
    assert!(Operation::unary(OpType::Abs, constant(1)).is_ok());
    assert!(Operation::unary(OpType::Maximum, constant(1)).is_err());
    assert!(OpType::Cosine.is_unary());
}

#[test]
fn invariance_is_conjunction_of_operands() {
    let node = mul(
        variable::<i32>("LocalCandidate.Industry").unwrap(),
        neg(variable::<i32>("RootCandidate.Industry").unwrap()),
    );
    let inv = node.invariance();
    assert!(!inv.local_candidate);
    assert!(!inv.root_candidate);
    assert!(inv.target && inv.source);
    assert_eq!(
        inv,
        Invariance::for_reference(ReferenceType::ConditionLocalCandidate)
            .and(Invariance::for_reference(ReferenceType::ConditionRootCandidate))
    );
}

#[test]
fn dump_parenthesizes_by_precedence() {
    let d = |n: ValueRef<i32>| n.dump();
    assert_eq!(d(mul(add(constant(1), constant(2)), constant(3))), "(1 + 2) * 3");
    assert_eq!(d(add(constant(1), mul(constant(2), constant(3)))), "1 + 2 * 3");
    assert_eq!(d(sub(sub(constant(1), constant(2)), constant(3))), "1 - 2 - 3");
    assert_eq!(d(sub(constant(1), sub(constant(2), constant(3)))), "1 - (2 - 3)");
    assert_eq!(d(div(constant(8), mul(constant(2), constant(2)))), "8 / (2 * 2)");
}

#[test]
fn dump_exponent_chains() {
    let d = |n: ValueRef<i32>| n.dump();
    assert_eq!(d(pow(constant(2), pow(constant(3), constant(4)))), "2 ^ (3 ^ 4)");
    assert_eq!(d(pow(pow(constant(2), constant(3)), constant(4))), "(2 ^ 3) ^ 4");
    assert_eq!(d(pow(add(constant(1), constant(2)), constant(2))), "(1 + 2) ^ 2");
    assert_eq!(d(mul(pow(constant(2), constant(3)), constant(4))), "2 ^ 3 * 4");
}

#[test]
fn dump_negation_and_functions() {
    let d = |n: ValueRef<i32>| n.dump();
    assert_eq!(d(neg(constant(3))), "-3");
    assert_eq!(d(neg(add(constant(1), constant(2)))), "-(1 + 2)");
    assert_eq!(d(neg(neg(constant(1)))), "-(-1)");
    assert_eq!(d(neg(abs(constant(1)))), "-abs(1)");
    assert_eq!(d(add(constant(1), neg(constant(2)))), "1 + (-2)");
    assert_eq!(d(neg(constant(-3))), "-(-3)");
    assert_eq!(d(mul(abs(add(constant(1), constant(2))), constant(3))), "abs(1 + 2) * 3");
    assert_eq!(d(max(constant(1), sub(constant(5), constant(2)))), "max(1, 5 - 2)");
    assert_eq!(d(random(constant(1), constant(6))), "random(1, 6)");
    assert_eq!(
        d(mul(static_cast(add(constant(1.0), constant(2.0))), constant(3))),
        "(1.0 + 2.0) * 3"
    );
}

#[test]
fn dump_wraps_negative_literals() {
    let d = |n: ValueRef<i32>| n.dump();
    assert_eq!(d(pow(constant(-2), constant(2))), "(-2) ^ 2");
    assert_eq!(d(pow(constant(2), constant(-2))), "2 ^ (-2)");
    assert_eq!(d(sub(constant(1), constant(-1))), "1 - (-1)");
    assert_eq!(d(mul(constant(-3), constant(4))), "(-3) * 4");
    assert_eq!(d(max(constant(-1), constant(2))), "max(-1, 2)");
    assert_eq!(
        pow(constant(-1.5), constant(2.0)).dump(),
        "(-1.5) ^ 2.0"
    );
}

#[test]
fn description_uses_same_precedence() {
    let strings = StringTable::new().with("DESC_VAR_INDUSTRY", "industry");
    let node = mul(
        add(variable::<f64>("Industry").unwrap(), constant(0.5)),
        constant(2.0),
    );
    assert_eq!(node.description(&strings), "(industry + 0.5) * 2");
}
