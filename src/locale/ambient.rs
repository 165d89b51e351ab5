//! Ambient platform locale
//!
//! Asks the operating system for the user's preferred locale and cleans it
//! into a tag such as `fr-CA` or `zh-Hant-TW`. Truncating the tag to a base
//! code is left to [`normalize`](super::normalize).

/// Locale tag the platform reports, if it reports a usable one
pub fn ambient_locale_tag() -> Option<String> {
    let raw = sys_locale::get_locale()?;
    let tag = clean_locale_tag(&raw);
    if tag.is_none() {
        log::debug!("Ignoring platform locale '{}'", raw);
    }
    tag
}

/// Turn a platform locale value into a tag
///
/// Drops a POSIX `.codeset` or `@modifier` suffix, joins subtags with `-`
/// and lowercases the language. `C`, `POSIX` and empty values yield `None`.
pub fn clean_locale_tag(value: &str) -> Option<String> {
    let value = value.trim();
    let value = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    if value.is_empty() || value == "C" || value == "POSIX" {
        return None;
    }

    let mut subtags = value.split(['-', '_']);
    let lang = subtags.next()?.to_lowercase();
    if lang.is_empty() {
        return None;
    }
    Some(subtags.fold(lang, |mut tag, subtag| {
        tag.push('-');
        tag.push_str(subtag);
        tag
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::normalize;

    #[test]
    fn test_clean_posix_values() {
        assert_eq!(clean_locale_tag("fr_CA.UTF-8"), Some("fr-CA".to_string()));
        assert_eq!(clean_locale_tag("de_DE@euro"), Some("de-DE".to_string()));
        assert_eq!(clean_locale_tag("en"), Some("en".to_string()));
        assert_eq!(clean_locale_tag("fr-CA"), Some("fr-CA".to_string()));
    }

    #[test]
    fn test_clean_keeps_every_subtag() {
        assert_eq!(clean_locale_tag("zh-Hant-TW"), Some("zh-Hant-TW".to_string()));
        assert_eq!(clean_locale_tag("sr_Latn_RS"), Some("sr-Latn-RS".to_string()));
        assert_eq!(
            clean_locale_tag("zh_Hans_CN.UTF-8"),
            Some("zh-Hans-CN".to_string())
        );
    }

    #[test]
    fn test_three_part_tags_normalize_to_language() {
        for raw in ["zh-Hant-TW", "zh_Hans_CN.UTF-8", "ZH_Hant_HK"] {
            let tag = clean_locale_tag(raw).unwrap();
            assert_eq!(normalize(&tag), "zh", "{}", raw);
        }
    }

    #[test]
    fn test_platform_tag_is_clean() {
        if let Some(tag) = ambient_locale_tag() {
            assert!(!tag.is_empty());
            assert!(!tag.contains(['.', '@', '_']), "{}", tag);
        }
    }

    #[test]
    fn test_clean_skips_c_locale() {
        assert_eq!(clean_locale_tag("C"), None);
        assert_eq!(clean_locale_tag("C.UTF-8"), None);
        assert_eq!(clean_locale_tag("POSIX"), None);
        assert_eq!(clean_locale_tag(""), None);
        assert_eq!(clean_locale_tag(".UTF-8"), None);
    }
}
