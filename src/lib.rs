//! Typed game-rule expression trees evaluated against a scripting context.
//!
//! An expression tree ([`ValueRef`]) computes an integer, floating-point, text or
//! game-enumeration value from a [`ScriptingContext`]: the source object, the effect
//! target, the candidates of nested condition evaluation and the current value.
//!
//! # Evaluation overview
//!
//! 1. **Build**: trees come from an external producer, or from the [`dsl`] builders.
//! 2. **Analyse**: [`ValueRef::invariance`] reports which context slots a tree reads,
//!    so callers can hoist evaluation out of per-candidate loops.
//! 3. **Evaluate**: [`ValueRef::eval`] walks the tree depth-first. [`Statistic`] nodes
//!    sample the [`Universe`] through a [`Condition`] and reduce the sampled values.
//! 4. **Render**: [`ValueRef::dump`] prints canonical script text and
//!    [`ValueRef::description`] localized text through a [`StringTable`].
//!
//! Evaluation is pure: trees are never mutated, and a given context always yields the
//! same result, `random(..)` included.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod eval;
mod expression;
mod foundation;
mod localization;
mod universe;

pub use eval::context::ScriptingContext;
pub use expression::cast::{StaticCast, StringCast};
pub use expression::constant::Constant;
pub use expression::dsl;
pub use expression::node::{AnyValueRef, Invariance, ValueRef};
pub use expression::operation::{OpType, Operation};
pub use expression::statistic::{Statistic, StatisticType};
pub use expression::value_type::RefValue;
pub use expression::variable::{ReferenceType, Variable};
pub use foundation::core::{
    ObjectId, PlanetEnvironment, PlanetSize, PlanetType, StarType, UniverseObjectType, Value,
    ValueKind,
};
pub use foundation::error::{ValueRefError, ValueRefResult};
pub use localization::string_table::{StringTable, flexible_format};
pub use universe::condition::{
    All, And, Condition, HasProperty, ObjectTypeIs, SourceObject, WithinIds,
};
pub use universe::object::{Universe, UniverseObject};
