use crate::expression::variable::ReferenceType;
use crate::foundation::core::Value;
use crate::universe::object::{Universe, UniverseObject};

static EMPTY_UNIVERSE: Universe = Universe::new();

/// Immutable bundle of object references threaded through every evaluation.
///
/// Cheap to copy: it only holds borrows of the universe and its objects. Child
/// contexts for nested condition evaluation are built with [`Self::nested`].
#[derive(Clone, Copy, Debug)]
pub struct ScriptingContext<'a> {
    /// Object graph consulted for property paths and sampling conditions.
    pub universe: &'a Universe,
    /// Object that originated the effect or condition.
    pub source: Option<&'a UniverseObject>,
    /// Object an effect is being applied to.
    pub effect_target: Option<&'a UniverseObject>,
    /// Candidate that started the current chain of nested conditions.
    pub condition_root_candidate: Option<&'a UniverseObject>,
    /// Candidate tested at the current nesting level.
    pub condition_local_candidate: Option<&'a UniverseObject>,
    /// Value being operated on, read by the `Value` variable.
    pub current_value: Option<&'a Value>,
    /// Seed for `RandomUniform` draws.
    pub seed: u64,
}

impl ScriptingContext<'static> {
    /// Context with no objects, backed by an empty universe.
    pub fn empty() -> Self {
        Self::new(&EMPTY_UNIVERSE)
    }
}

impl Default for ScriptingContext<'static> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> ScriptingContext<'a> {
    /// Context over `universe` with every object slot empty.
    pub fn new(universe: &'a Universe) -> Self {
        Self {
            universe,
            source: None,
            effect_target: None,
            condition_root_candidate: None,
            condition_local_candidate: None,
            current_value: None,
            seed: 0,
        }
    }

    /// Context with only a source object.
    pub fn for_source(universe: &'a Universe, source: &'a UniverseObject) -> Self {
        Self {
            source: Some(source),
            ..Self::new(universe)
        }
    }

    /// Context with a source and an effect target.
    pub fn for_target(
        universe: &'a Universe,
        source: Option<&'a UniverseObject>,
        target: &'a UniverseObject,
    ) -> Self {
        Self {
            source,
            effect_target: Some(target),
            ..Self::new(universe)
        }
    }

    /// Context for an effect operating on `current_value` of `target`.
    pub fn for_effect(
        universe: &'a Universe,
        source: Option<&'a UniverseObject>,
        target: &'a UniverseObject,
        current_value: &'a Value,
    ) -> Self {
        Self::for_target(universe, source, target).with_current_value(current_value)
    }

    /// Fully explicit context.
    pub fn explicit(
        universe: &'a Universe,
        source: Option<&'a UniverseObject>,
        effect_target: Option<&'a UniverseObject>,
        current_value: Option<&'a Value>,
        condition_root_candidate: Option<&'a UniverseObject>,
        condition_local_candidate: Option<&'a UniverseObject>,
    ) -> Self {
        Self {
            universe,
            source,
            effect_target,
            condition_root_candidate,
            condition_local_candidate,
            current_value,
            seed: 0,
        }
    }

    /// Same context with `current_value` replaced.
    pub fn with_current_value(self, value: &'a Value) -> Self {
        Self {
            current_value: Some(value),
            ..self
        }
    }

    /// Same context with a different random seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Child context for one more level of condition nesting.
    ///
    /// The root candidate is inherited when set, otherwise `candidate` becomes the root.
    pub fn nested(&self, candidate: &'a UniverseObject) -> Self {
        Self {
            condition_root_candidate: self.condition_root_candidate.or(Some(candidate)),
            condition_local_candidate: Some(candidate),
            ..*self
        }
    }

    /// Object selected by `reference`. `NonObject` selects nothing.
    pub fn object_for(&self, reference: ReferenceType) -> Option<&'a UniverseObject> {
        match reference {
            ReferenceType::NonObject => None,
            ReferenceType::Source => self.source,
            ReferenceType::EffectTarget => self.effect_target,
            ReferenceType::ConditionRootCandidate => self.condition_root_candidate,
            ReferenceType::ConditionLocalCandidate => self.condition_local_candidate,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/context.rs"]
mod tests;
