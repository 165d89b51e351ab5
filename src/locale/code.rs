//! Locale code normalization

/// Base language code of a locale tag
///
/// Truncates at the first `-` or `_`: `fr-CA` and `fr_CA` both become `fr`.
/// The result is not checked against any list of languages.
pub fn normalize(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or_default()
}
