use crate::eval::context::ScriptingContext;
use crate::expression::cast::{StaticCast, StringCast};
use crate::expression::constant::Constant;
use crate::expression::operation::{OpType, Operation};
use crate::expression::statistic::Statistic;
use crate::expression::value_type::RefValue;
use crate::expression::variable::{ReferenceType, Variable};
use crate::foundation::core::{PlanetEnvironment, PlanetSize, PlanetType, StarType, UniverseObjectType};
use crate::foundation::core::{Value, ValueKind};
use crate::foundation::error::ValueRefResult;
use crate::localization::string_table::StringTable;

/// Per-axis independence of an expression from the scripting context.
///
/// A `true` flag guarantees the result cannot change when only that context slot
/// changes, which lets callers hoist evaluation out of per-candidate loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Invariance {
    /// Independent of the condition root candidate.
    pub root_candidate: bool,
    /// Independent of the condition local candidate.
    pub local_candidate: bool,
    /// Independent of the effect target.
    pub target: bool,
    /// Independent of the source object.
    pub source: bool,
}

impl Invariance {
    /// Invariant on every axis.
    pub const ALL: Self = Self {
        root_candidate: true,
        local_candidate: true,
        target: true,
        source: true,
    };

    /// Flags of something that reads exactly the slot selected by `reference`.
    pub fn for_reference(reference: ReferenceType) -> Self {
        Self {
            root_candidate: reference != ReferenceType::ConditionRootCandidate,
            local_candidate: reference != ReferenceType::ConditionLocalCandidate,
            target: reference != ReferenceType::EffectTarget,
            source: reference != ReferenceType::Source,
        }
    }

    /// Axis-wise conjunction.
    pub fn and(self, other: Self) -> Self {
        Self {
            root_candidate: self.root_candidate && other.root_candidate,
            local_candidate: self.local_candidate && other.local_candidate,
            target: self.target && other.target,
            source: self.source && other.source,
        }
    }
}

/// Typed expression tree evaluating to `T`.
///
/// Trees are immutable once built and exclusively own their children. Equality is
/// structural: the same variant with recursively equal contents.
#[derive(Debug, PartialEq)]
pub enum ValueRef<T: RefValue> {
    /// Fixed value.
    Constant(Constant<T>),
    /// Property read through a context reference.
    Variable(Variable<T>),
    /// Aggregate over objects selected by a sampling condition.
    Statistic(Statistic<T>),
    /// Numeric conversion of an expression of another type.
    StaticCast(StaticCast<T>),
    /// Text rendering of an expression of another type.
    StringCast(StringCast<T>),
    /// Arithmetic or function node.
    Operation(Operation<T>),
}

impl<T: RefValue> ValueRef<T> {
    /// Evaluate against `ctx`.
    pub fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        match self {
            Self::Constant(n) => Ok(n.eval()),
            Self::Variable(n) => n.eval(ctx),
            Self::Statistic(n) => n.eval(ctx),
            Self::StaticCast(n) => n.eval(ctx),
            Self::StringCast(n) => n.eval(ctx),
            Self::Operation(n) => n.eval(ctx),
        }
    }

    /// Evaluate against [`ScriptingContext::empty`].
    pub fn eval_without_context(&self) -> ValueRefResult<T> {
        self.eval(&ScriptingContext::empty())
    }

    /// Independence flags, computed bottom-up.
    pub fn invariance(&self) -> Invariance {
        match self {
            Self::Constant(_) => Invariance::ALL,
            Self::Variable(n) => n.invariance(),
            Self::Statistic(n) => n.invariance(),
            Self::StaticCast(n) => n.invariance(),
            Self::StringCast(n) => n.invariance(),
            Self::Operation(n) => n.invariance(),
        }
    }

    /// Independent of the condition root candidate.
    pub fn root_candidate_invariant(&self) -> bool {
        self.invariance().root_candidate
    }

    /// Independent of the condition local candidate.
    pub fn local_candidate_invariant(&self) -> bool {
        self.invariance().local_candidate
    }

    /// Independent of the effect target.
    pub fn target_invariant(&self) -> bool {
        self.invariance().target
    }

    /// Independent of the source object.
    pub fn source_invariant(&self) -> bool {
        self.invariance().source
    }

    /// `true` for constants and operations built only from constants.
    ///
    /// `RandomUniform` is never a constant expression.
    pub fn is_constant_expr(&self) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Operation(n) => n.is_constant_expr(),
            _ => false,
        }
    }

    /// Localized human-readable text.
    pub fn description(&self, strings: &StringTable) -> String {
        match self {
            Self::Constant(n) => n.description(strings),
            Self::Variable(n) => n.description(strings),
            Self::Statistic(n) => n.description(strings),
            Self::StaticCast(n) => n.description(strings),
            Self::StringCast(n) => n.description(strings),
            Self::Operation(n) => n.description(strings),
        }
    }

    /// Canonical script text.
    pub fn dump(&self) -> String {
        match self {
            Self::Constant(n) => n.dump(),
            Self::Variable(n) => n.dump(),
            Self::Statistic(n) => n.dump(),
            Self::StaticCast(n) => n.dump(),
            Self::StringCast(n) => n.dump(),
            Self::Operation(n) => n.dump(),
        }
    }

    /// Operator at the top of the rendered text, seen through casts.
    pub(crate) fn top_level_op(&self) -> Option<OpType> {
        match self {
            Self::Operation(n) => Some(n.op()),
            Self::StaticCast(n) => n.top_level_op(),
            Self::StringCast(n) => n.top_level_op(),
            _ => None,
        }
    }

    /// Erase the result type.
    pub fn erase(self) -> AnyValueRef {
        T::erase(self)
    }
}

/// Expression tree of any supported result type.
///
/// Casts hold their operand in this form; evaluation yields a dynamically typed
/// [`Value`].
#[derive(Debug, PartialEq)]
pub enum AnyValueRef {
    /// `i32` tree.
    Int(ValueRef<i32>),
    /// `f64` tree.
    Double(ValueRef<f64>),
    /// Text tree.
    Text(ValueRef<String>),
    /// Planet size tree.
    PlanetSize(ValueRef<PlanetSize>),
    /// Planet type tree.
    PlanetType(ValueRef<PlanetType>),
    /// Planet environment tree.
    PlanetEnvironment(ValueRef<PlanetEnvironment>),
    /// Object type tree.
    ObjectType(ValueRef<UniverseObjectType>),
    /// Star type tree.
    StarType(ValueRef<StarType>),
}

macro_rules! dispatch {
    ($self:expr, $node:ident => $body:expr) => {
        match $self {
            AnyValueRef::Int($node) => $body,
            AnyValueRef::Double($node) => $body,
            AnyValueRef::Text($node) => $body,
            AnyValueRef::PlanetSize($node) => $body,
            AnyValueRef::PlanetType($node) => $body,
            AnyValueRef::PlanetEnvironment($node) => $body,
            AnyValueRef::ObjectType($node) => $body,
            AnyValueRef::StarType($node) => $body,
        }
    };
}

impl AnyValueRef {
    /// Declared result type.
    pub fn kind(&self) -> ValueKind {
        fn kind_of<T: RefValue>(_: &ValueRef<T>) -> ValueKind {
            T::KIND
        }
        dispatch!(self, n => kind_of(n))
    }

    /// Evaluate and wrap the result.
    pub fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<Value> {
        dispatch!(self, n => n.eval(ctx).map(RefValue::into_value))
    }

    /// See [`ValueRef::invariance`].
    pub fn invariance(&self) -> Invariance {
        dispatch!(self, n => n.invariance())
    }

    /// See [`ValueRef::is_constant_expr`].
    pub fn is_constant_expr(&self) -> bool {
        dispatch!(self, n => n.is_constant_expr())
    }

    /// See [`ValueRef::description`].
    pub fn description(&self, strings: &StringTable) -> String {
        dispatch!(self, n => n.description(strings))
    }

    /// See [`ValueRef::dump`].
    pub fn dump(&self) -> String {
        dispatch!(self, n => n.dump())
    }

    pub(crate) fn top_level_op(&self) -> Option<OpType> {
        dispatch!(self, n => n.top_level_op())
    }
}

impl<T: RefValue> From<ValueRef<T>> for AnyValueRef {
    fn from(node: ValueRef<T>) -> Self {
        T::erase(node)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/node.rs"]
mod tests;
