use crate::expression::value_type::RefValue;
use crate::localization::string_table::StringTable;

/// Leaf holding a fixed value. Ignores the context entirely.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant<T: RefValue> {
    value: T,
}

impl<T: RefValue> Constant<T> {
    /// Wrap `value`.
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Stored value.
    pub fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn eval(&self) -> T {
        self.value.clone()
    }

    pub(crate) fn description(&self, strings: &StringTable) -> String {
        self.value.describe(strings)
    }

    pub(crate) fn dump(&self) -> String {
        self.value.dump_literal()
    }
}
