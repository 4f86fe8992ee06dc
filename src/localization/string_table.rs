use std::collections::BTreeMap;

use crate::foundation::error::{ValueRefError, ValueRefResult};

/// Localization table mapping string keys to user-facing text.
///
/// Templates use positional `%1%`, `%2%`, ... placeholders (see [`flexible_format`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl StringTable {
    /// Create an empty table. Every lookup falls back to its key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of `key: text` pairs.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> ValueRefResult<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| ValueRefError::config(format!("string table json: {e}")))?;
        tracing::debug!(entries = table.len(), "loaded string table");
        Ok(table)
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Builder-style [`Self::insert`].
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(key, text);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup without fallback.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// User string for `key`, or the key itself when the table has no entry.
    pub fn user_string(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(text) => text.to_owned(),
            None => {
                tracing::trace!(key, "missing user string");
                key.to_owned()
            }
        }
    }

    /// Format the template stored under `key`. Returns `None` when the key is missing.
    pub fn format(&self, key: &str, args: &[String]) -> Option<String> {
        self.lookup(key).map(|template| flexible_format(template, args))
    }
}

/// Substitute `%N%` placeholders (1-based) with `args[N - 1]`.
///
/// `%%` renders a literal percent sign. Placeholders without a matching argument
/// and stray `%` characters are kept verbatim.
pub fn flexible_format(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let closed = digits > 0 && after[digits..].starts_with('%');
        let arg = closed
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| args.get(i));

        match arg {
            Some(arg) => {
                out.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/localization/string_table.rs"]
mod tests;
