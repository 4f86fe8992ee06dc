use std::any::Any;
use std::fmt;

use crate::eval::context::ScriptingContext;
use crate::foundation::core::{ObjectId, UniverseObjectType};
use crate::foundation::error::ValueRefResult;
use crate::localization::string_table::StringTable;
use crate::universe::object::UniverseObject;

/// Object-matching predicate used by statistics to sample the universe.
///
/// `eval` returns matches in a stable order without duplicates. The invariance
/// predicates default to `false`; an implementation only claims independence it
/// can guarantee.
pub trait Condition: fmt::Debug + Send + Sync {
    /// Objects matching this condition in `ctx`.
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>>;

    /// Result does not depend on the condition root candidate.
    fn root_candidate_invariant(&self) -> bool {
        false
    }

    /// Result does not depend on the effect target.
    fn target_invariant(&self) -> bool {
        false
    }

    /// Result does not depend on the source object.
    fn source_invariant(&self) -> bool {
        false
    }

    /// Localized human-readable text.
    fn description(&self, strings: &StringTable) -> String;

    /// Canonical script text.
    fn dump(&self) -> String;

    /// Downcasting hook for [`Condition::eq_condition`].
    fn as_any(&self) -> &dyn Any;

    /// Structural equality across trait objects.
    fn eq_condition(&self, other: &dyn Condition) -> bool;
}

impl PartialEq for dyn Condition {
    fn eq(&self, other: &Self) -> bool {
        self.eq_condition(other)
    }
}

fn same<C: PartialEq + 'static>(this: &C, other: &dyn Condition) -> bool {
    other.as_any().downcast_ref::<C>() == Some(this)
}

macro_rules! context_free {
    () => {
        fn root_candidate_invariant(&self) -> bool {
            true
        }

        fn target_invariant(&self) -> bool {
            true
        }

        fn source_invariant(&self) -> bool {
            true
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn eq_condition(&self, other: &dyn Condition) -> bool {
            same(self, other)
        }
    };
}

/// Matches every object in the universe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct All;

impl Condition for All {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        Ok(ctx.universe.objects().collect())
    }

    fn description(&self, strings: &StringTable) -> String {
        strings.user_string("DESC_ALL")
    }

    fn dump(&self) -> String {
        "All".to_owned()
    }

    context_free!();
}

/// Matches objects of one concrete type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectTypeIs(pub UniverseObjectType);

impl Condition for ObjectTypeIs {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        Ok(ctx
            .universe
            .objects()
            .filter(|o| o.object_type == self.0)
            .collect())
    }

    fn description(&self, strings: &StringTable) -> String {
        let ty = strings.user_string(self.0.string_key());
        strings
            .format("DESC_OBJECT_TYPE", std::slice::from_ref(&ty))
            .unwrap_or(ty)
    }

    fn dump(&self) -> String {
        self.0.keyword().to_owned()
    }

    context_free!();
}

/// Matches an explicit id list. Unknown ids are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WithinIds(pub Vec<ObjectId>);

impl Condition for WithinIds {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        let mut out: Vec<&'a UniverseObject> = Vec::with_capacity(self.0.len());
        for id in &self.0 {
            if let Some(obj) = ctx.universe.object(*id)
                && !out.iter().any(|o| o.id == *id)
            {
                out.push(obj);
            }
        }
        Ok(out)
    }

    fn description(&self, strings: &StringTable) -> String {
        let ids = self.id_list();
        strings
            .format("DESC_OBJECT_ID", std::slice::from_ref(&ids))
            .unwrap_or(ids)
    }

    fn dump(&self) -> String {
        format!("Object id = [{}]", self.id_list())
    }

    context_free!();
}

impl WithinIds {
    fn id_list(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Matches objects that carry a named entry in their property map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HasProperty(pub String);

impl Condition for HasProperty {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        Ok(ctx
            .universe
            .objects()
            .filter(|o| o.properties.contains_key(&self.0))
            .collect())
    }

    fn description(&self, strings: &StringTable) -> String {
        let name = strings.user_string(&format!("DESC_VAR_{}", self.0.to_uppercase()));
        strings
            .format("DESC_HAS_PROPERTY", std::slice::from_ref(&name))
            .unwrap_or(name)
    }

    fn dump(&self) -> String {
        format!("HasProperty name = \"{}\"", self.0)
    }

    context_free!();
}

/// Matches the context's source object, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceObject;

impl Condition for SourceObject {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        Ok(ctx.source.into_iter().collect())
    }

    fn root_candidate_invariant(&self) -> bool {
        true
    }

    fn target_invariant(&self) -> bool {
        true
    }

    fn description(&self, strings: &StringTable) -> String {
        strings.user_string("DESC_SOURCE")
    }

    fn dump(&self) -> String {
        "Source".to_owned()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_condition(&self, other: &dyn Condition) -> bool {
        same(self, other)
    }
}

/// Intersection of several conditions, in the order of the first operand.
#[derive(Debug)]
pub struct And(pub Vec<Box<dyn Condition>>);

impl PartialEq for And {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.eq_condition(b.as_ref()))
    }
}

impl Condition for And {
    fn eval<'a>(&self, ctx: &ScriptingContext<'a>) -> ValueRefResult<Vec<&'a UniverseObject>> {
        let Some((first, rest)) = self.0.split_first() else {
            return Ok(Vec::new());
        };
        let mut matches = first.eval(ctx)?;
        for cond in rest {
            let other = cond.eval(ctx)?;
            matches.retain(|m| other.iter().any(|o| o.id == m.id));
        }
        Ok(matches)
    }

    fn root_candidate_invariant(&self) -> bool {
        self.0.iter().all(|c| c.root_candidate_invariant())
    }

    fn target_invariant(&self) -> bool {
        self.0.iter().all(|c| c.target_invariant())
    }

    fn source_invariant(&self) -> bool {
        self.0.iter().all(|c| c.source_invariant())
    }

    fn description(&self, strings: &StringTable) -> String {
        let parts: Vec<String> = self.0.iter().map(|c| c.description(strings)).collect();
        let sep = format!(" {} ", strings.user_string("DESC_AND"));
        parts.join(&sep)
    }

    fn dump(&self) -> String {
        let parts: Vec<String> = self.0.iter().map(|c| c.dump()).collect();
        format!("And [ {} ]", parts.join(" "))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_condition(&self, other: &dyn Condition) -> bool {
        same(self, other)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/universe/condition.rs"]
mod tests;
