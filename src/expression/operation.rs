use std::fmt;

use crate::eval::context::ScriptingContext;
use crate::expression::node::{Invariance, ValueRef};
use crate::expression::value_type::{Numeric, RefValue};
use crate::foundation::error::{ValueRefError, ValueRefResult};
use crate::foundation::math::random_unit;
use crate::localization::string_table::StringTable;

/// Operator of an [`Operation`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OpType {
    /// `a + b`; concatenation for text.
    Plus,
    /// `a - b`
    Minus,
    /// `a * b`
    Times,
    /// `a / b`
    Divide,
    /// `a ^ b`
    Exponentiate,
    /// `-a`
    Negate,
    /// `abs(a)`
    Abs,
    /// `log(a)`, natural logarithm.
    Logarithm,
    /// `sin(a)`
    Sine,
    /// `cos(a)`
    Cosine,
    /// `min(a, b)`
    Minimum,
    /// `max(a, b)`
    Maximum,
    /// `random(a, b)`, uniform draw between the bounds.
    RandomUniform,
}

impl OpType {
    /// `true` for operators taking a single operand.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Self::Negate | Self::Abs | Self::Logarithm | Self::Sine | Self::Cosine
        )
    }

    fn is_infix(self) -> bool {
        self.infix_symbol().is_some()
    }

    fn infix_symbol(self) -> Option<&'static str> {
        match self {
            Self::Plus => Some("+"),
            Self::Minus => Some("-"),
            Self::Times => Some("*"),
            Self::Divide => Some("/"),
            Self::Exponentiate => Some("^"),
            _ => None,
        }
    }

    fn function_name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Logarithm => "log",
            Self::Sine => "sin",
            Self::Cosine => "cos",
            Self::Minimum => "min",
            Self::Maximum => "max",
            Self::RandomUniform => "random",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Times => "times",
            Self::Divide => "divide",
            Self::Exponentiate => "pow",
            Self::Negate => "neg",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Plus | Self::Minus => 1,
            Self::Times | Self::Divide => 2,
            Self::Exponentiate => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.infix_symbol().unwrap_or_else(|| self.function_name()))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn needs_parens(parent: OpType, child: Option<OpType>, side: Side) -> bool {
    let Some(child) = child else {
        return false;
    };
    if child == OpType::Negate {
        return true;
    }
    if !child.is_infix() {
        return false;
    }
    if parent == OpType::Exponentiate {
        return true;
    }
    match child.precedence().cmp(&parent.precedence()) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Equal => side == Side::Right,
        std::cmp::Ordering::Greater => false,
    }
}

/// Unary or binary operator node over operands of the same result type.
#[derive(Debug, PartialEq)]
pub struct Operation<T: RefValue> {
    op: OpType,
    lhs: Box<ValueRef<T>>,
    rhs: Option<Box<ValueRef<T>>>,
}

impl<T: RefValue> Operation<T> {
    /// Build a binary operation. Fails for unary operators.
    pub fn binary(op: OpType, lhs: ValueRef<T>, rhs: ValueRef<T>) -> ValueRefResult<Self> {
        if op.is_unary() {
            return Err(ValueRefError::config(format!("{op:?} takes one operand")));
        }
        Ok(Self::from_parts(op, lhs, Some(rhs)))
    }

    /// Build a unary operation. Fails for binary operators.
    pub fn unary(op: OpType, operand: ValueRef<T>) -> ValueRefResult<Self> {
        if !op.is_unary() {
            return Err(ValueRefError::config(format!("{op:?} takes two operands")));
        }
        Ok(Self::from_parts(op, operand, None))
    }

    /// Arity is the caller's responsibility.
    pub(crate) fn from_parts(op: OpType, lhs: ValueRef<T>, rhs: Option<ValueRef<T>>) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: rhs.map(Box::new),
        }
    }

    /// Operator tag.
    pub fn op(&self) -> OpType {
        self.op
    }

    /// First (or only) operand.
    pub fn lhs(&self) -> &ValueRef<T> {
        &self.lhs
    }

    /// Second operand of a binary operation.
    pub fn rhs(&self) -> Option<&ValueRef<T>> {
        self.rhs.as_deref()
    }

    pub(crate) fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        let lhs = self.lhs.eval(ctx)?;
        let rhs = match &self.rhs {
            Some(rhs) => Some(rhs.eval(ctx)?),
            None => None,
        };
        T::apply(self.op, lhs, rhs, ctx)
    }

    pub(crate) fn invariance(&self) -> Invariance {
        let lhs = self.lhs.invariance();
        match &self.rhs {
            Some(rhs) => lhs.and(rhs.invariance()),
            None => lhs,
        }
    }

    pub(crate) fn is_constant_expr(&self) -> bool {
        self.op != OpType::RandomUniform
            && self.lhs.is_constant_expr()
            && self.rhs.as_ref().is_none_or(|r| r.is_constant_expr())
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        self.render(&|node| node.description(strings))
    }

    pub(crate) fn dump(&self) -> String {
        self.render(&|node| node.dump())
    }

    fn render(&self, text: &dyn Fn(&ValueRef<T>) -> String) -> String {
        let lhs_node: &ValueRef<T> = &self.lhs;
        let lhs = text(lhs_node);

        if self.op == OpType::Negate {
            return match lhs_node.top_level_op() {
                Some(op) if op.is_infix() || op == OpType::Negate => format!("-({lhs})"),
                _ if lhs.starts_with('-') => format!("-({lhs})"),
                _ => format!("-{lhs}"),
            };
        }

        let Some(rhs_node) = self.rhs.as_deref() else {
            return format!("{}({lhs})", self.op.function_name());
        };
        let rhs = text(rhs_node);

        match self.op.infix_symbol() {
            Some(symbol) => {
                // Negative literals are wrapped like negations.
                let wrap = |s: String, node: &ValueRef<T>, side| {
                    if needs_parens(self.op, node.top_level_op(), side) || s.starts_with('-') {
                        format!("({s})")
                    } else {
                        s
                    }
                };
                format!(
                    "{} {symbol} {}",
                    wrap(lhs, lhs_node, Side::Left),
                    wrap(rhs, rhs_node, Side::Right)
                )
            }
            None => format!("{}({lhs}, {rhs})", self.op.function_name()),
        }
    }
}

fn operand<T>(op: OpType, rhs: Option<T>) -> ValueRefResult<T> {
    rhs.ok_or_else(|| ValueRefError::invalid_operation(format!("{op:?} is missing its second operand")))
}

fn not_defined(op: OpType, kind: impl fmt::Display) -> ValueRefError {
    ValueRefError::invalid_operation(format!("{op:?} is not defined for {kind}"))
}

/// Integer and floating-point operator semantics.
pub(crate) fn apply_numeric<N: Numeric>(
    op: OpType,
    lhs: N,
    rhs: Option<N>,
    ctx: &ScriptingContext<'_>,
) -> ValueRefResult<N> {
    let overflow = || ValueRefError::arithmetic(format!("{op:?} overflows {}", N::KIND));

    match op {
        OpType::Plus => lhs.checked_add(operand(op, rhs)?).ok_or_else(overflow),
        OpType::Minus => lhs.checked_sub(operand(op, rhs)?).ok_or_else(overflow),
        OpType::Times => lhs.checked_mul(operand(op, rhs)?).ok_or_else(overflow),
        OpType::Divide => {
            let rhs = operand(op, rhs)?;
            if rhs == N::ZERO {
                return Err(ValueRefError::arithmetic("division by zero"));
            }
            lhs.checked_div(rhs).ok_or_else(overflow)
        }
        OpType::Exponentiate => lhs.checked_pow(operand(op, rhs)?).ok_or_else(overflow),
        OpType::Negate => lhs.checked_neg().ok_or_else(overflow),
        OpType::Abs => lhs.checked_abs().ok_or_else(overflow),
        OpType::Logarithm => {
            if lhs <= N::ZERO {
                return Err(ValueRefError::arithmetic(format!(
                    "logarithm of non-positive value {}",
                    lhs.to_f64()
                )));
            }
            N::from_f64(lhs.to_f64().ln())
        }
        OpType::Sine => N::from_f64(lhs.to_f64().sin()),
        OpType::Cosine => N::from_f64(lhs.to_f64().cos()),
        OpType::Minimum => {
            let rhs = operand(op, rhs)?;
            Ok(if rhs < lhs { rhs } else { lhs })
        }
        OpType::Maximum => {
            let rhs = operand(op, rhs)?;
            Ok(if rhs > lhs { rhs } else { lhs })
        }
        OpType::RandomUniform => {
            let rhs = operand(op, rhs)?;
            let (lo, hi) = if rhs < lhs { (rhs, lhs) } else { (lhs, rhs) };
            let unit = random_unit(ctx.seed, lo.to_f64(), hi.to_f64());
            N::uniform(lo, hi, unit).ok_or_else(overflow)
        }
    }
}

/// Text supports concatenation and lexical `min`/`max`.
pub(crate) fn apply_text(op: OpType, lhs: String, rhs: Option<String>) -> ValueRefResult<String> {
    match op {
        OpType::Plus => Ok(lhs + &operand(op, rhs)?),
        OpType::Minimum | OpType::Maximum => apply_ordered(op, lhs, rhs),
        _ => Err(not_defined(op, "string")),
    }
}

/// Enumerations only support `min`/`max` by declaration order.
pub(crate) fn apply_ordered<T: RefValue + Ord>(
    op: OpType,
    lhs: T,
    rhs: Option<T>,
) -> ValueRefResult<T> {
    match op {
        OpType::Minimum => Ok(std::cmp::min(lhs, operand(op, rhs)?)),
        OpType::Maximum => Ok(std::cmp::max(lhs, operand(op, rhs)?)),
        _ => Err(not_defined(op, T::KIND)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/operation.rs"]
mod tests;
