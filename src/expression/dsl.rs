//! Free-function builders for expression trees.
//!
//! ```
//! use valueref::dsl::{add, constant, mul};
//!
//! let tree = mul(add(constant(1), constant(2)), constant(3));
//! assert_eq!(tree.dump(), "(1 + 2) * 3");
//! assert_eq!(tree.eval_without_context().unwrap(), 9);
//! ```

use crate::expression::cast::{StaticCast, StringCast};
use crate::expression::constant::Constant;
use crate::expression::node::{AnyValueRef, ValueRef};
use crate::expression::operation::{OpType, Operation};
use crate::expression::statistic::{Statistic, StatisticType};
use crate::expression::value_type::RefValue;
use crate::expression::variable::Variable;
use crate::foundation::error::ValueRefResult;
use crate::universe::condition::Condition;

/// Constant leaf.
pub fn constant<T: RefValue>(value: T) -> ValueRef<T> {
    ValueRef::Constant(Constant::new(value))
}

/// Variable leaf from a dotted path such as `Target.Population`.
pub fn variable<T: RefValue>(dotted: &str) -> ValueRefResult<ValueRef<T>> {
    Variable::parse(dotted).map(ValueRef::Variable)
}

/// The context's current value.
pub fn value<T: RefValue>() -> ValueRef<T> {
    ValueRef::Variable(Variable::current_value())
}

/// Statistic over the `property` path of every object matching `condition`.
pub fn statistic<T: RefValue>(
    stat: StatisticType,
    property: &str,
    condition: impl Condition + 'static,
) -> ValueRefResult<ValueRef<T>> {
    Statistic::new(property, stat, Box::new(condition)).map(ValueRef::Statistic)
}

/// Number of objects matching `condition`.
pub fn count<T: RefValue>(condition: impl Condition + 'static) -> ValueRefResult<ValueRef<T>> {
    statistic(StatisticType::Count, "", condition)
}

/// Numeric conversion of `operand`.
pub fn static_cast<T: RefValue>(operand: impl Into<AnyValueRef>) -> ValueRef<T> {
    ValueRef::StaticCast(StaticCast::new(operand))
}

/// Text rendering of `operand`.
pub fn string_cast(operand: impl Into<AnyValueRef>) -> ValueRef<String> {
    ValueRef::StringCast(StringCast::new(operand))
}

fn binary<T: RefValue>(op: OpType, lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    ValueRef::Operation(Operation::from_parts(op, lhs, Some(rhs)))
}

fn unary<T: RefValue>(op: OpType, operand: ValueRef<T>) -> ValueRef<T> {
    ValueRef::Operation(Operation::from_parts(op, operand, None))
}

/// `lhs + rhs`
pub fn add<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Plus, lhs, rhs)
}

/// `lhs - rhs`
pub fn sub<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Minus, lhs, rhs)
}

/// `lhs * rhs`
pub fn mul<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Times, lhs, rhs)
}

/// `lhs / rhs`
pub fn div<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Divide, lhs, rhs)
}

/// `base ^ exp`
pub fn pow<T: RefValue>(base: ValueRef<T>, exp: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Exponentiate, base, exp)
}

/// `-operand`
pub fn neg<T: RefValue>(operand: ValueRef<T>) -> ValueRef<T> {
    unary(OpType::Negate, operand)
}

/// `abs(operand)`
pub fn abs<T: RefValue>(operand: ValueRef<T>) -> ValueRef<T> {
    unary(OpType::Abs, operand)
}

/// `log(operand)`, natural logarithm.
pub fn log<T: RefValue>(operand: ValueRef<T>) -> ValueRef<T> {
    unary(OpType::Logarithm, operand)
}

/// `sin(operand)`
pub fn sin<T: RefValue>(operand: ValueRef<T>) -> ValueRef<T> {
    unary(OpType::Sine, operand)
}

/// `cos(operand)`
pub fn cos<T: RefValue>(operand: ValueRef<T>) -> ValueRef<T> {
    unary(OpType::Cosine, operand)
}

/// `min(lhs, rhs)`
pub fn min<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Minimum, lhs, rhs)
}

/// `max(lhs, rhs)`
pub fn max<T: RefValue>(lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::Maximum, lhs, rhs)
}

/// `random(lo, hi)`
pub fn random<T: RefValue>(lo: ValueRef<T>, hi: ValueRef<T>) -> ValueRef<T> {
    binary(OpType::RandomUniform, lo, hi)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/dsl.rs"]
mod tests;
