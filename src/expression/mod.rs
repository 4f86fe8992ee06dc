pub(crate) mod cast;
pub(crate) mod constant;
pub mod dsl;
pub(crate) mod node;
pub(crate) mod operation;
pub(crate) mod statistic;
pub(crate) mod value_type;
pub(crate) mod variable;
