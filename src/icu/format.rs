//! Message formatting
//!
//! Substitutes values into a parsed message. Number, date and time styles are
//! not interpreted: values are written out as given. Plural branches are
//! chosen by exact `=n` match first, then by a small per-language
//! `one`/`other` rule, then `other`.

use super::ast::{MessageElement, PluralType};
use super::parser::parse;
use crate::error::FormatError;
use std::collections::BTreeMap;
use std::fmt;

/// A value supplied for a placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Number(f64),
}

impl ArgValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            ArgValue::Number(n) => Some(*n),
            ArgValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Number(n) => write_number(f, *n),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Number(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Number(value as f64)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        ArgValue::Number(f64::from(value))
    }
}

/// Placeholder values keyed by argument name
pub type Values = BTreeMap<String, ArgValue>;

/// Build a [`Values`] map from `(name, value)` pairs
pub fn values<K, V, I>(pairs: I) -> Values
where
    K: Into<String>,
    V: Into<ArgValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parse and format a raw template string
pub fn format_template(template: &str, values: &Values, locale: &str) -> Result<String, FormatError> {
    let elements = parse(template)?;
    format_elements(&elements, values, locale)
}

/// Format a parsed message
pub fn format_elements(
    elements: &[MessageElement],
    values: &Values,
    locale: &str,
) -> Result<String, FormatError> {
    let mut out = String::new();
    Formatter { values, locale }.write(&mut out, elements, None)?;
    Ok(out)
}

struct Formatter<'a> {
    values: &'a Values,
    locale: &'a str,
}

impl Formatter<'_> {
    fn value(&self, name: &str) -> Result<&ArgValue, FormatError> {
        self.values
            .get(name)
            .ok_or_else(|| FormatError::MissingValue(name.to_string()))
    }

    fn write(
        &self,
        out: &mut String,
        elements: &[MessageElement],
        pound: Option<f64>,
    ) -> Result<(), FormatError> {
        for element in elements {
            match element {
                MessageElement::Literal(text) => out.push_str(text),
                MessageElement::Argument(name)
                | MessageElement::Number { name, .. }
                | MessageElement::Date { name, .. }
                | MessageElement::Time { name, .. } => {
                    out.push_str(&self.value(name)?.to_string());
                }
                MessageElement::Pound => match pound {
                    Some(n) => out.push_str(&NumberDisplay(n).to_string()),
                    None => out.push('#'),
                },
                MessageElement::Select { name, options } => {
                    let key = self.value(name)?.to_string();
                    if let Some(branch) = options.get(&key).or_else(|| options.get("other")) {
                        self.write(out, branch, pound)?;
                    }
                }
                MessageElement::Plural {
                    name,
                    options,
                    offset,
                    plural_type,
                } => {
                    let n = self
                        .value(name)?
                        .as_number()
                        .ok_or_else(|| FormatError::NotANumber(name.clone()))?;
                    let adjusted = n - *offset as f64;
                    let exact = options
                        .iter()
                        .find(|(key, _)| {
                            key.strip_prefix('=')
                                .and_then(|k| k.parse::<f64>().ok())
                                .is_some_and(|k| k == n)
                        })
                        .map(|(_, branch)| branch);
                    let branch = exact
                        .or_else(|| options.get(plural_category(self.locale, adjusted, *plural_type)))
                        .or_else(|| options.get("other"));
                    if let Some(branch) = branch {
                        self.write(out, branch, Some(adjusted))?;
                    }
                }
                MessageElement::Tag { name, children } => {
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                    self.write(out, children, pound)?;
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
        Ok(())
    }
}

/// Minimal plural category for the languages this project ships
pub fn plural_category(locale: &str, n: f64, plural_type: PluralType) -> &'static str {
    let integer = n.fract() == 0.0;
    match plural_type {
        PluralType::Cardinal => match locale {
            "fr" if n >= 0.0 && n < 2.0 => "one",
            "fr" => "other",
            _ if integer && n == 1.0 => "one",
            _ => "other",
        },
        PluralType::Ordinal => match locale {
            "fr" if n == 1.0 => "one",
            "en" if integer => {
                let i = n.abs() as u64;
                match (i % 10, i % 100) {
                    (1, r) if r != 11 => "one",
                    (2, r) if r != 12 => "two",
                    (3, r) if r != 13 => "few",
                    _ => "other",
                }
            }
            _ => "other",
        },
    }
}

struct NumberDisplay(f64);

impl fmt::Display for NumberDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.0)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_simple_argument() {
        let out = format_template("My name is {name}", &values([("name", "Akash")]), "en").unwrap();
        assert_eq!(out, "My name is Akash");
    }

    #[test]
    fn test_format_missing_value() {
        let err = format_template("My name is {name}", &Values::new(), "en").unwrap_err();
        assert_eq!(err, FormatError::MissingValue("name".to_string()));
    }

    #[test]
    fn test_format_number_drops_trailing_zero() {
        let out = format_template("{n, number} items", &values([("n", 3.0)]), "en").unwrap();
        assert_eq!(out, "3 items");
        let out = format_template("{n, number}", &values([("n", 2.5)]), "en").unwrap();
        assert_eq!(out, "2.5");
    }

    #[test]
    fn test_format_select() {
        let template = "{role, select, admin {Admin} other {User}}";
        assert_eq!(
            format_template(template, &values([("role", "admin")]), "en").unwrap(),
            "Admin"
        );
        assert_eq!(
            format_template(template, &values([("role", "guest")]), "en").unwrap(),
            "User"
        );
    }

    #[test]
    fn test_format_plural_exact_category_and_pound() {
        let template = "{count, plural, =0 {no files} one {# file} other {# files}}";
        let render = |n: i64| format_template(template, &values([("count", n)]), "en").unwrap();
        assert_eq!(render(0), "no files");
        assert_eq!(render(1), "1 file");
        assert_eq!(render(7), "7 files");
    }

    #[test]
    fn test_format_plural_offset() {
        let template = "{n, plural, offset:1 =1 {just you} one {you and # other} other {you and # others}}";
        let render = |n: i64| format_template(template, &values([("n", n)]), "en").unwrap();
        assert_eq!(render(1), "just you");
        assert_eq!(render(2), "you and 1 other");
        assert_eq!(render(4), "you and 3 others");
    }

    #[test]
    fn test_format_plural_french_zero_is_one() {
        let template = "{n, plural, one {# fichier} other {# fichiers}}";
        assert_eq!(
            format_template(template, &values([("n", 0)]), "fr").unwrap(),
            "0 fichier"
        );
        assert_eq!(
            format_template(template, &values([("n", 0)]), "en").unwrap(),
            "0 fichiers"
        );
    }

    #[test]
    fn test_format_plural_rejects_text() {
        let err = format_template("{n, plural, other {#}}", &values([("n", "many")]), "en").unwrap_err();
        assert_eq!(err, FormatError::NotANumber("n".to_string()));
    }

    #[test]
    fn test_format_tag_keeps_markup() {
        let out = format_template("Hi <b>{name}</b>", &values([("name", "Akash")]), "en").unwrap();
        assert_eq!(out, "Hi <b>Akash</b>");
    }

    #[test]
    fn test_ordinal_categories() {
        assert_eq!(plural_category("en", 1.0, PluralType::Ordinal), "one");
        assert_eq!(plural_category("en", 22.0, PluralType::Ordinal), "two");
        assert_eq!(plural_category("en", 13.0, PluralType::Ordinal), "other");
        assert_eq!(plural_category("fr", 1.0, PluralType::Ordinal), "one");
    }
}
