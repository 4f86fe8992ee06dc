pub(crate) mod string_table;
