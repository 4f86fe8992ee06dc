use std::marker::PhantomData;

use crate::eval::context::ScriptingContext;
use crate::expression::node::{AnyValueRef, Invariance};
use crate::expression::operation::OpType;
use crate::expression::value_type::RefValue;
use crate::foundation::core::Value;
use crate::foundation::error::ValueRefResult;
use crate::localization::string_table::StringTable;

/// Numeric conversion of an operand of another result type.
///
/// Int and double convert both ways (doubles truncate toward zero), enumerations
/// convert to and from their integer codes, object links to their id.
#[derive(Debug, PartialEq)]
pub struct StaticCast<T: RefValue> {
    operand: Box<AnyValueRef>,
    _ty: PhantomData<fn() -> T>,
}

impl<T: RefValue> StaticCast<T> {
    /// Wrap `operand`.
    pub fn new(operand: impl Into<AnyValueRef>) -> Self {
        Self {
            operand: Box::new(operand.into()),
            _ty: PhantomData,
        }
    }

    /// Wrapped operand.
    pub fn operand(&self) -> &AnyValueRef {
        &self.operand
    }

    pub(crate) fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        T::static_cast(self.operand.eval(ctx)?)
    }

    pub(crate) fn invariance(&self) -> Invariance {
        self.operand.invariance()
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        self.operand.description(strings)
    }

    pub(crate) fn dump(&self) -> String {
        self.operand.dump()
    }

    pub(crate) fn top_level_op(&self) -> Option<OpType> {
        self.operand.top_level_op()
    }
}

/// Text rendering of an operand of another result type.
#[derive(Debug, PartialEq)]
pub struct StringCast<T: RefValue> {
    operand: Box<AnyValueRef>,
    _ty: PhantomData<fn() -> T>,
}

impl StringCast<String> {
    /// Wrap `operand`.
    pub fn new(operand: impl Into<AnyValueRef>) -> Self {
        Self {
            operand: Box::new(operand.into()),
            _ty: PhantomData,
        }
    }
}

impl<T: RefValue> StringCast<T> {
    /// Wrapped operand.
    pub fn operand(&self) -> &AnyValueRef {
        &self.operand
    }

    pub(crate) fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        let text = self.operand.eval(ctx)?.to_string();
        T::from_value(&Value::Text(text))
    }

    pub(crate) fn invariance(&self) -> Invariance {
        self.operand.invariance()
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        self.operand.description(strings)
    }

    pub(crate) fn dump(&self) -> String {
        self.operand.dump()
    }

    pub(crate) fn top_level_op(&self) -> Option<OpType> {
        self.operand.top_level_op()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/cast.rs"]
mod tests;
