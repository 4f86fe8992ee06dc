pub(crate) mod condition;
pub(crate) mod object;
