//! Message element tree
//!
//! Compiled catalogs store each message as a list of [`MessageElement`]s.
//! On disk every element is a JSON object with a numeric `type` tag:
//!
//! | type | element  |
//! |------|----------|
//! | 0    | literal  |
//! | 1    | argument |
//! | 2    | number   |
//! | 3    | date     |
//! | 4    | time     |
//! | 5    | select   |
//! | 6    | plural   |
//! | 7    | pound    |
//! | 8    | tag      |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plural flavour of a `plural` / `selectordinal` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PluralType {
    #[default]
    Cardinal,
    Ordinal,
}

/// One node of a parsed message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawElement", into = "RawElement")]
pub enum MessageElement {
    /// Plain text
    Literal(String),

    /// `{name}`
    Argument(String),

    /// `{name, number, style}`
    Number { name: String, style: Option<String> },

    /// `{name, date, style}`
    Date { name: String, style: Option<String> },

    /// `{name, time, style}`
    Time { name: String, style: Option<String> },

    /// `{name, select, key {...} other {...}}`
    Select {
        name: String,
        options: BTreeMap<String, Vec<MessageElement>>,
    },

    /// `{name, plural, offset:n =0 {...} one {...} other {...}}`
    Plural {
        name: String,
        options: BTreeMap<String, Vec<MessageElement>>,
        offset: i64,
        plural_type: PluralType,
    },

    /// `#` inside a plural branch
    Pound,

    /// `<name>children</name>`
    Tag {
        name: String,
        children: Vec<MessageElement>,
    },
}

impl MessageElement {
    /// Numeric tag used in the serialized form
    pub fn type_code(&self) -> u8 {
        match self {
            MessageElement::Literal(_) => 0,
            MessageElement::Argument(_) => 1,
            MessageElement::Number { .. } => 2,
            MessageElement::Date { .. } => 3,
            MessageElement::Time { .. } => 4,
            MessageElement::Select { .. } => 5,
            MessageElement::Plural { .. } => 6,
            MessageElement::Pound => 7,
            MessageElement::Tag { .. } => 8,
        }
    }

    /// Argument name this element reads, if any
    pub fn argument_name(&self) -> Option<&str> {
        match self {
            MessageElement::Argument(name)
            | MessageElement::Number { name, .. }
            | MessageElement::Date { name, .. }
            | MessageElement::Time { name, .. }
            | MessageElement::Select { name, .. }
            | MessageElement::Plural { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Collect every argument name referenced by a message, in first-use order
pub fn argument_names(elements: &[MessageElement]) -> Vec<String> {
    let mut names = Vec::new();
    collect_names(elements, &mut names);
    names
}

fn collect_names(elements: &[MessageElement], names: &mut Vec<String>) {
    for element in elements {
        if let Some(name) = element.argument_name() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        match element {
            MessageElement::Select { options, .. } | MessageElement::Plural { options, .. } => {
                for branch in options.values() {
                    collect_names(branch, names);
                }
            }
            MessageElement::Tag { children, .. } => collect_names(children, names),
            _ => {}
        }
    }
}

/// Wire shape of a branch inside `options`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawOption {
    value: Vec<MessageElement>,
}

/// Wire shape of an element; the variant is selected by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<BTreeMap<String, RawOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    plural_type: Option<PluralType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<MessageElement>>,
}

impl RawElement {
    fn new(kind: u8) -> Self {
        Self {
            kind,
            value: None,
            style: None,
            options: None,
            offset: None,
            plural_type: None,
            children: None,
        }
    }

    fn with_value(kind: u8, value: String) -> Self {
        Self {
            value: Some(value),
            ..Self::new(kind)
        }
    }

    fn take_value(&mut self) -> Result<String, String> {
        self.value
            .take()
            .ok_or_else(|| format!("element of type {} has no value", self.kind))
    }

    fn take_options(&mut self) -> Result<BTreeMap<String, Vec<MessageElement>>, String> {
        self.options
            .take()
            .map(|options| options.into_iter().map(|(k, o)| (k, o.value)).collect())
            .ok_or_else(|| format!("element of type {} has no options", self.kind))
    }
}

impl TryFrom<RawElement> for MessageElement {
    type Error = String;

    fn try_from(mut raw: RawElement) -> Result<Self, Self::Error> {
        let element = match raw.kind {
            0 => MessageElement::Literal(raw.take_value()?),
            1 => MessageElement::Argument(raw.take_value()?),
            2 => MessageElement::Number {
                name: raw.take_value()?,
                style: raw.style,
            },
            3 => MessageElement::Date {
                name: raw.take_value()?,
                style: raw.style,
            },
            4 => MessageElement::Time {
                name: raw.take_value()?,
                style: raw.style,
            },
            5 => MessageElement::Select {
                name: raw.take_value()?,
                options: raw.take_options()?,
            },
            6 => MessageElement::Plural {
                name: raw.take_value()?,
                options: raw.take_options()?,
                offset: raw.offset.unwrap_or(0),
                plural_type: raw.plural_type.unwrap_or_default(),
            },
            7 => MessageElement::Pound,
            8 => MessageElement::Tag {
                name: raw.take_value()?,
                children: raw.children.unwrap_or_default(),
            },
            other => return Err(format!("unknown element type {}", other)),
        };
        Ok(element)
    }
}

impl From<MessageElement> for RawElement {
    fn from(element: MessageElement) -> Self {
        let kind = element.type_code();
        match element {
            MessageElement::Literal(value) | MessageElement::Argument(value) => {
                RawElement::with_value(kind, value)
            }
            MessageElement::Number { name, style }
            | MessageElement::Date { name, style }
            | MessageElement::Time { name, style } => RawElement {
                style,
                ..RawElement::with_value(kind, name)
            },
            MessageElement::Select { name, options } => RawElement {
                options: Some(wrap_options(options)),
                ..RawElement::with_value(kind, name)
            },
            MessageElement::Plural {
                name,
                options,
                offset,
                plural_type,
            } => RawElement {
                options: Some(wrap_options(options)),
                offset: Some(offset),
                plural_type: Some(plural_type),
                ..RawElement::with_value(kind, name)
            },
            MessageElement::Pound => RawElement::new(kind),
            MessageElement::Tag { name, children } => RawElement {
                children: Some(children),
                ..RawElement::with_value(kind, name)
            },
        }
    }
}

fn wrap_options(options: BTreeMap<String, Vec<MessageElement>>) -> BTreeMap<String, RawOption> {
    options
        .into_iter()
        .map(|(key, value)| (key, RawOption { value }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_and_argument_wire_shape() {
        let elements = vec![
            MessageElement::Literal("My name is ".to_string()),
            MessageElement::Argument("name".to_string()),
        ];
        let value = serde_json::to_value(&elements).unwrap();
        assert_eq!(
            value,
            json!([
                {"type": 0, "value": "My name is "},
                {"type": 1, "value": "name"}
            ])
        );
    }

    #[test]
    fn test_plural_wire_shape() {
        let mut options = BTreeMap::new();
        options.insert("one".to_string(), vec![MessageElement::Pound]);
        options.insert(
            "other".to_string(),
            vec![MessageElement::Literal("many".to_string())],
        );
        let element = MessageElement::Plural {
            name: "count".to_string(),
            options,
            offset: 0,
            plural_type: PluralType::Cardinal,
        };
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], 6);
        assert_eq!(value["pluralType"], "cardinal");
        assert_eq!(value["options"]["one"]["value"][0]["type"], 7);
    }

    #[test]
    fn test_deserialize_rejects_unknown_type() {
        let result: Result<MessageElement, _> =
            serde_json::from_value(json!({"type": 42, "value": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_missing_value() {
        let result: Result<MessageElement, _> = serde_json::from_value(json!({"type": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_argument_names_walks_branches() {
        let mut options = BTreeMap::new();
        options.insert(
            "other".to_string(),
            vec![MessageElement::Argument("place".to_string())],
        );
        let elements = vec![
            MessageElement::Argument("name".to_string()),
            MessageElement::Select {
                name: "gender".to_string(),
                options,
            },
        ];
        assert_eq!(argument_names(&elements), vec!["name", "gender", "place"]);
    }
}
