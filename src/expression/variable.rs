use std::fmt;
use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::eval::context::ScriptingContext;
use crate::expression::node::Invariance;
use crate::expression::value_type::RefValue;
use crate::foundation::error::{ValueRefError, ValueRefResult};
use crate::localization::string_table::StringTable;

/// Context slot a variable reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ReferenceType {
    /// Universe-level property, no object involved.
    NonObject,
    /// The source object.
    Source,
    /// The effect target.
    EffectTarget,
    /// The candidate tested at the current condition nesting level.
    ConditionLocalCandidate,
    /// The candidate that started the nested condition chain.
    ConditionRootCandidate,
}

impl ReferenceType {
    /// Classify the first segment of a dotted path.
    pub fn from_segment(segment: &str) -> Self {
        match segment {
            "Source" => Self::Source,
            "Target" | VALUE_SEGMENT => Self::EffectTarget,
            "LocalCandidate" => Self::ConditionLocalCandidate,
            "RootCandidate" => Self::ConditionRootCandidate,
            _ => Self::NonObject,
        }
    }

    fn string_key(self) -> Option<&'static str> {
        match self {
            Self::NonObject => None,
            Self::Source => Some("DESC_VAR_SOURCE"),
            Self::EffectTarget => Some("DESC_VAR_TARGET"),
            Self::ConditionLocalCandidate => Some("DESC_VAR_LOCAL_CANDIDATE"),
            Self::ConditionRootCandidate => Some("DESC_VAR_ROOT_CANDIDATE"),
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NonObject => "non-object",
            Self::Source => "source",
            Self::EffectTarget => "effect target",
            Self::ConditionLocalCandidate => "local candidate",
            Self::ConditionRootCandidate => "root candidate",
        })
    }
}

const VALUE_SEGMENT: &str = "Value";

/// Leaf reading a dotted property path through a context reference.
///
/// The reference type comes from the first segment (`Source`, `Target`, `Value`,
/// `LocalCandidate`, `RootCandidate`); any other first segment makes the whole path
/// a universe-level property. The single-segment path `Value` reads the context's
/// current value instead of an object.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable<T: RefValue> {
    ref_type: ReferenceType,
    path: SmallVec<[String; 4]>,
    _ty: PhantomData<fn() -> T>,
}

impl<T: RefValue> Variable<T> {
    /// Build from path segments, deriving the reference type from the first one.
    pub fn new<I, S>(segments: I) -> ValueRefResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: SmallVec<[String; 4]> = segments.into_iter().map(Into::into).collect();
        let Some(first) = path.first() else {
            return Err(ValueRefError::config("variable path is empty"));
        };
        if path.iter().any(String::is_empty) {
            return Err(ValueRefError::config(format!(
                "variable path `{}` has an empty segment",
                path.join(".")
            )));
        }
        Ok(Self {
            ref_type: ReferenceType::from_segment(first),
            path,
            _ty: PhantomData,
        })
    }

    /// Parse a dotted name such as `Source.Owner.Industry`.
    pub fn parse(dotted: &str) -> ValueRefResult<Self> {
        Self::new(dotted.split('.'))
    }

    /// The `Value` variable, reading the context's current value.
    pub fn current_value() -> Self {
        Self {
            ref_type: ReferenceType::EffectTarget,
            path: std::iter::once(VALUE_SEGMENT.to_owned()).collect(),
            _ty: PhantomData,
        }
    }

    /// Path relative to whatever object the caller supplies; always `NonObject`.
    pub(crate) fn relative(path: SmallVec<[String; 4]>) -> Self {
        Self {
            ref_type: ReferenceType::NonObject,
            path,
            _ty: PhantomData,
        }
    }

    /// Context slot this variable reads.
    pub fn reference_type(&self) -> ReferenceType {
        self.ref_type
    }

    /// Every segment, including the reference segment.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Segments looked up on the referenced object.
    fn property_path(&self) -> &[String] {
        match self.ref_type {
            ReferenceType::NonObject => &self.path,
            _ => &self.path[1..],
        }
    }

    fn is_current_value(&self) -> bool {
        self.path.len() == 1 && self.path[0] == VALUE_SEGMENT
    }

    pub(crate) fn eval(&self, ctx: &ScriptingContext<'_>) -> ValueRefResult<T> {
        self.eval_as(self.ref_type, ctx)
    }

    /// Evaluate as if this variable had reference type `reference`.
    pub(crate) fn eval_as(
        &self,
        reference: ReferenceType,
        ctx: &ScriptingContext<'_>,
    ) -> ValueRefResult<T> {
        if self.is_current_value() {
            let value = ctx.current_value.ok_or_else(|| {
                ValueRefError::property("no current value in scripting context")
            })?;
            return T::from_value(value);
        }

        if reference == ReferenceType::NonObject {
            let name = self.dump();
            let value = ctx
                .universe
                .property(&name)
                .ok_or_else(|| ValueRefError::property(format!("unknown universe property `{name}`")))?;
            return T::from_value(value);
        }

        let obj = ctx
            .object_for(reference)
            .ok_or_else(|| ValueRefError::unresolved(reference, self.dump()))?;
        let value = ctx.universe.resolve_path(obj, self.property_path())?;
        T::from_value(&value)
    }

    pub(crate) fn invariance(&self) -> Invariance {
        Invariance::for_reference(self.ref_type)
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        if self.is_current_value() {
            return strings.user_string("DESC_VAR_VALUE");
        }

        let Some((first, rest)) = self.path.split_first() else {
            return String::new();
        };
        let mut args = Vec::with_capacity(self.path.len());
        args.push(match self.ref_type.string_key() {
            Some(key) => strings.user_string(key),
            None => segment_name(strings, first),
        });
        args.extend(rest.iter().map(|seg| segment_name(strings, seg)));

        let key = format!("DESC_VALUE_REF_MULTIPART_VARIABLE{}", rest.len());
        strings
            .format(&key, &args)
            .unwrap_or_else(|| args.join(" "))
    }

    pub(crate) fn dump(&self) -> String {
        self.path.join(".")
    }
}

fn segment_name(strings: &StringTable, segment: &str) -> String {
    strings.user_string(&format!("DESC_VAR_{}", segment.to_uppercase()))
}

#[cfg(test)]
#[path = "../../tests/unit/expression/variable.rs"]
mod tests;
