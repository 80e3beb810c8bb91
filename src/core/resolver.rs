//! Column alias resolution: the first alias with a non-blank value wins.

use crate::domain::model::Row;

/// Returns the value of the first alias present in `row` with a non-blank
/// value, or `fallback` when none match. The value is returned as stored.
pub fn resolve<'a, S: AsRef<str>>(row: &'a Row, aliases: &[S], fallback: &'a str) -> &'a str {
    resolve_opt(row, aliases).unwrap_or(fallback)
}

/// Like [`resolve`], but absence is `None` instead of a fallback.
pub fn resolve_opt<'a, S: AsRef<str>>(row: &'a Row, aliases: &[S]) -> Option<&'a str> {
    aliases
        .iter()
        .filter_map(|alias| row.get(alias.as_ref()))
        .map(String::as_str)
        .find(|value| !value.trim().is_empty())
}
