use regex::{Captures, Regex};
use std::sync::LazyLock;

// Captures the field name inside `{FieldName}`.
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid placeholder regex"));

/// Replaces every `{Name}` in `template` in a single pass.
///
/// Substituted values are never scanned again, so a value that itself looks
/// like `{Other}` is emitted verbatim. Placeholders `lookup` does not know are
/// left in the output untouched.
pub fn substitute<'a, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<&'a str>,
{
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match lookup(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
