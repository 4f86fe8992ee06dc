use std::fmt;

use ordered_float::OrderedFloat;

use crate::eval::context::ScriptingContext;
use crate::expression::node::{AnyValueRef, ValueRef};
use crate::expression::operation::{self, OpType};
use crate::expression::statistic::{self, StatisticType};
use crate::foundation::core::{PlanetEnvironment, PlanetSize, PlanetType, StarType, UniverseObjectType};
use crate::foundation::core::{Value, ValueKind};
use crate::foundation::error::{ValueRefError, ValueRefResult};
use crate::localization::string_table::StringTable;

mod private {
    pub trait Sealed {}
}

/// Result type an expression tree can evaluate to.
///
/// Implemented for `i32`, `f64`, `String` and the game enumerations. The trait is
/// sealed: the set of result types is closed so trees can be type-erased into
/// [`AnyValueRef`].
pub trait RefValue: private::Sealed + Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Totally ordered key used for distinct counts and mode histograms.
    type Key: Ord;

    /// Type tag of this result type.
    const KIND: ValueKind;

    /// Histogram key of this value.
    fn key(&self) -> Self::Key;

    /// Read a dynamically typed value at this type.
    fn from_value(value: &Value) -> ValueRefResult<Self>;

    /// Wrap into a dynamically typed value.
    fn into_value(self) -> Value;

    /// Numeric conversion used by static casts.
    fn static_cast(value: Value) -> ValueRefResult<Self>;

    /// Literal in script syntax.
    fn dump_literal(&self) -> String;

    /// Localized human-readable text.
    fn describe(&self, strings: &StringTable) -> String;

    /// Wrap a tree of this type into [`AnyValueRef`].
    fn erase(node: ValueRef<Self>) -> AnyValueRef;

    /// Apply an operator to evaluated operands. `rhs` is `None` for unary operators.
    fn apply(
        op: OpType,
        lhs: Self,
        rhs: Option<Self>,
        ctx: &ScriptingContext<'_>,
    ) -> ValueRefResult<Self>;

    /// Whether statistic `stat` is defined for this type.
    fn supports_statistic(stat: StatisticType) -> bool;

    /// Reduce sampled values. `matches` is the number of sampled objects, which is
    /// also the input for `Count` and `If`, whose `values` are left empty.
    fn reduce(stat: StatisticType, values: &[Self], matches: usize) -> ValueRefResult<Self>;
}

/// Arithmetic shared by the integer and floating-point families.
///
/// The `checked_*` operations return `None` on overflow or a non-finite result.
pub(crate) trait Numeric: RefValue + Copy + PartialOrd {
    const ZERO: Self;
    const ONE: Self;

    fn checked_add(self, rhs: Self) -> Option<Self>;
    fn checked_sub(self, rhs: Self) -> Option<Self>;
    fn checked_mul(self, rhs: Self) -> Option<Self>;
    /// Called with a non-zero divisor only.
    fn checked_div(self, rhs: Self) -> Option<Self>;
    fn checked_pow(self, exp: Self) -> Option<Self>;
    fn checked_neg(self) -> Option<Self>;
    fn checked_abs(self) -> Option<Self>;

    fn to_f64(self) -> f64;
    /// Integers truncate toward zero; non-finite or out-of-range input is an error.
    fn from_f64(v: f64) -> ValueRefResult<Self>;
    fn from_count(n: usize) -> ValueRefResult<Self>;

    /// Map a unit draw in `[0, 1)` onto the range between `lo <= hi`.
    /// `None` when the result is not finite.
    fn uniform(lo: Self, hi: Self, unit: f64) -> Option<Self>;
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl private::Sealed for i32 {}

impl Numeric for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        i32::checked_add(self, rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        i32::checked_sub(self, rhs)
    }

    fn checked_mul(self, rhs: Self) -> Option<Self> {
        i32::checked_mul(self, rhs)
    }

    fn checked_div(self, rhs: Self) -> Option<Self> {
        i32::checked_div(self, rhs)
    }

    fn checked_pow(self, exp: Self) -> Option<Self> {
        match u32::try_from(exp) {
            Ok(exp) => i32::checked_pow(self, exp),
            Err(_) => Self::from_f64(f64::from(self).powf(f64::from(exp))).ok(),
        }
    }

    fn checked_neg(self) -> Option<Self> {
        i32::checked_neg(self)
    }

    fn checked_abs(self) -> Option<Self> {
        i32::checked_abs(self)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn from_f64(v: f64) -> ValueRefResult<Self> {
        if !v.is_finite() {
            return Err(ValueRefError::arithmetic(format!("{v} is not a finite number")));
        }
        let t = v.trunc();
        if t < f64::from(i32::MIN) || t > f64::from(i32::MAX) {
            return Err(ValueRefError::arithmetic(format!("{v} does not fit in an int")));
        }
        Ok(t as i32)
    }

    fn from_count(n: usize) -> ValueRefResult<Self> {
        i32::try_from(n).map_err(|_| ValueRefError::arithmetic(format!("count {n} overflows int")))
    }

    fn uniform(lo: Self, hi: Self, unit: f64) -> Option<Self> {
        let span = i64::from(hi) - i64::from(lo) + 1;
        let offset = (unit * span as f64).floor() as i64;
        let v = (i64::from(lo) + offset).min(i64::from(hi));
        i32::try_from(v).ok()
    }
}

impl RefValue for i32 {
    type Key = i32;
    const KIND: ValueKind = ValueKind::Int;

    fn key(&self) -> Self::Key {
        *self
    }

    fn from_value(value: &Value) -> ValueRefResult<Self> {
        match value {
            Value::Int(v) => Ok(*v),
            Value::Object(id) => Ok(id.0),
            other => Err(ValueRefError::type_mismatch(Self::KIND, other.kind())),
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn static_cast(value: Value) -> ValueRefResult<Self> {
        match value {
            Value::Int(v) => Ok(v),
            Value::Double(v) => Self::from_f64(v),
            Value::PlanetSize(v) => Ok(v.code()),
            Value::PlanetType(v) => Ok(v.code()),
            Value::PlanetEnvironment(v) => Ok(v.code()),
            Value::ObjectType(v) => Ok(v.code()),
            Value::StarType(v) => Ok(v.code()),
            Value::Object(id) => Ok(id.0),
            Value::Text(s) => Err(ValueRefError::invalid_operation(format!(
                "cannot cast text \"{s}\" to int"
            ))),
        }
    }

    fn dump_literal(&self) -> String {
        self.to_string()
    }

    fn describe(&self, _strings: &StringTable) -> String {
        self.to_string()
    }

    fn erase(node: ValueRef<Self>) -> AnyValueRef {
        AnyValueRef::Int(node)
    }

    fn apply(
        op: OpType,
        lhs: Self,
        rhs: Option<Self>,
        ctx: &ScriptingContext<'_>,
    ) -> ValueRefResult<Self> {
        operation::apply_numeric(op, lhs, rhs, ctx)
    }

    fn supports_statistic(_stat: StatisticType) -> bool {
        true
    }

    fn reduce(stat: StatisticType, values: &[Self], matches: usize) -> ValueRefResult<Self> {
        statistic::reduce_numeric(stat, values, matches)
    }
}

impl private::Sealed for f64 {}

impl Numeric for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn checked_add(self, rhs: Self) -> Option<Self> {
        finite(self + rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        finite(self - rhs)
    }

    fn checked_mul(self, rhs: Self) -> Option<Self> {
        finite(self * rhs)
    }

    fn checked_div(self, rhs: Self) -> Option<Self> {
        finite(self / rhs)
    }

    fn checked_pow(self, exp: Self) -> Option<Self> {
        finite(self.powf(exp))
    }

    fn checked_neg(self) -> Option<Self> {
        finite(-self)
    }

    fn checked_abs(self) -> Option<Self> {
        finite(self.abs())
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(v: f64) -> ValueRefResult<Self> {
        finite(v).ok_or_else(|| ValueRefError::arithmetic(format!("{v} is not a finite number")))
    }

    fn from_count(n: usize) -> ValueRefResult<Self> {
        Ok(n as f64)
    }

    fn uniform(lo: Self, hi: Self, unit: f64) -> Option<Self> {
        // Weighted form: `hi - lo` alone overflows for bounds of opposite sign.
        finite(lo * (1.0 - unit) + hi * unit)
    }
}

impl RefValue for f64 {
    type Key = OrderedFloat<f64>;
    const KIND: ValueKind = ValueKind::Double;

    fn key(&self) -> Self::Key {
        OrderedFloat(*self)
    }

    fn from_value(value: &Value) -> ValueRefResult<Self> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Int(v) => Ok(f64::from(*v)),
            other => Err(ValueRefError::type_mismatch(Self::KIND, other.kind())),
        }
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }

    fn static_cast(value: Value) -> ValueRefResult<Self> {
        match value {
            Value::Double(v) => Ok(v),
            Value::Text(s) => Err(ValueRefError::invalid_operation(format!(
                "cannot cast text \"{s}\" to double"
            ))),
            other => i32::static_cast(other).map(f64::from),
        }
    }

    fn dump_literal(&self) -> String {
        format!("{self:?}")
    }

    fn describe(&self, _strings: &StringTable) -> String {
        let fixed = format!("{self:.3}");
        let trimmed = if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.')
        } else {
            &fixed
        };
        match trimmed {
            "-0" => "0".to_owned(),
            other => other.to_owned(),
        }
    }

    fn erase(node: ValueRef<Self>) -> AnyValueRef {
        AnyValueRef::Double(node)
    }

    fn apply(
        op: OpType,
        lhs: Self,
        rhs: Option<Self>,
        ctx: &ScriptingContext<'_>,
    ) -> ValueRefResult<Self> {
        operation::apply_numeric(op, lhs, rhs, ctx)
    }

    fn supports_statistic(_stat: StatisticType) -> bool {
        true
    }

    fn reduce(stat: StatisticType, values: &[Self], matches: usize) -> ValueRefResult<Self> {
        statistic::reduce_numeric(stat, values, matches)
    }
}

impl private::Sealed for String {}

impl RefValue for String {
    type Key = String;
    const KIND: ValueKind = ValueKind::Text;

    fn key(&self) -> Self::Key {
        self.clone()
    }

    fn from_value(value: &Value) -> ValueRefResult<Self> {
        match value {
            Value::Text(v) => Ok(v.clone()),
            other => Err(ValueRefError::type_mismatch(Self::KIND, other.kind())),
        }
    }

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn static_cast(value: Value) -> ValueRefResult<Self> {
        Err(ValueRefError::invalid_operation(format!(
            "static cast from {} to string; use a string cast",
            value.kind()
        )))
    }

    fn dump_literal(&self) -> String {
        format!("\"{self}\"")
    }

    fn describe(&self, strings: &StringTable) -> String {
        strings.user_string(self)
    }

    fn erase(node: ValueRef<Self>) -> AnyValueRef {
        AnyValueRef::Text(node)
    }

    fn apply(
        op: OpType,
        lhs: Self,
        rhs: Option<Self>,
        _ctx: &ScriptingContext<'_>,
    ) -> ValueRefResult<Self> {
        operation::apply_text(op, lhs, rhs)
    }

    fn supports_statistic(stat: StatisticType) -> bool {
        stat == StatisticType::Mode
    }

    fn reduce(stat: StatisticType, values: &[Self], _matches: usize) -> ValueRefResult<Self> {
        match stat {
            StatisticType::Mode => Ok(statistic::mode(values).unwrap_or_default()),
            other => Err(statistic::unsupported::<Self>(other)),
        }
    }
}

macro_rules! enum_ref_value {
    ($($ty:ident => $variant:ident),+ $(,)?) => {$(
        impl private::Sealed for $ty {}

        impl RefValue for $ty {
            type Key = Self;
            const KIND: ValueKind = ValueKind::$variant;

            fn key(&self) -> Self::Key {
                *self
            }

            fn from_value(value: &Value) -> ValueRefResult<Self> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(ValueRefError::type_mismatch(Self::KIND, other.kind())),
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn static_cast(value: Value) -> ValueRefResult<Self> {
                let code = match value {
                    Value::$variant(v) => return Ok(v),
                    Value::Int(code) => code,
                    Value::Double(v) => <i32 as Numeric>::from_f64(v)?,
                    other => return Err(ValueRefError::type_mismatch(Self::KIND, other.kind())),
                };
                Self::from_code(code).ok_or_else(|| {
                    ValueRefError::arithmetic(format!("{code} is not a valid {}", Self::KIND))
                })
            }

            fn dump_literal(&self) -> String {
                self.keyword().to_owned()
            }

            fn describe(&self, strings: &StringTable) -> String {
                strings.user_string(self.string_key())
            }

            fn erase(node: ValueRef<Self>) -> AnyValueRef {
                AnyValueRef::$variant(node)
            }

            fn apply(
                op: OpType,
                lhs: Self,
                rhs: Option<Self>,
                _ctx: &ScriptingContext<'_>,
            ) -> ValueRefResult<Self> {
                operation::apply_ordered(op, lhs, rhs)
            }

            fn supports_statistic(stat: StatisticType) -> bool {
                matches!(
                    stat,
                    StatisticType::Mode | StatisticType::Max | StatisticType::Min
                )
            }

            fn reduce(stat: StatisticType, values: &[Self], _matches: usize) -> ValueRefResult<Self> {
                statistic::reduce_ordered(stat, values, Self::Invalid)
            }
        }
    )+};
}

enum_ref_value! {
    PlanetSize => PlanetSize,
    PlanetType => PlanetType,
    PlanetEnvironment => PlanetEnvironment,
    UniverseObjectType => ObjectType,
    StarType => StarType,
}

#[cfg(test)]
#[path = "../../tests/unit/expression/value_type.rs"]
mod tests;
