//! Message provider for the rendering layer
//!
//! [`Intl`] wraps one loaded `{ locale, messages }` pair. Display sites hand
//! it a [`MessageDescriptor`] plus values and get a formatted string back.

use crate::catalog::MessageDefinition;
use crate::error::FormatError;
use crate::icu::{argument_names, format_elements, format_template, parse, Values};
use crate::locale::{LocaleData, MessageRepr};
use std::sync::Arc;

/// A message as declared at its display site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    pub id: String,
    pub definition: MessageDefinition,
}

impl MessageDescriptor {
    pub fn new(id: impl Into<String>, default_message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            definition: MessageDefinition::new(default_message),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.definition = self.definition.with_description(description);
        self
    }

    pub fn default_message(&self) -> &str {
        &self.definition.default_message
    }
}

/// Formats messages for one locale
#[derive(Debug, Clone)]
pub struct Intl {
    data: Arc<LocaleData>,
    default_locale: String,
}

impl Intl {
    pub fn new(data: Arc<LocaleData>, default_locale: impl Into<String>) -> Self {
        Self {
            data,
            default_locale: default_locale.into(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.data.locale
    }

    /// Format a message, never failing
    ///
    /// Falls back to the descriptor's default message when the catalog has
    /// no entry for the id, and to the raw template text when formatting
    /// fails.
    pub fn format_message(&self, descriptor: &MessageDescriptor, values: &Values) -> String {
        match self.try_format_message(descriptor, values) {
            Ok(text) => text,
            Err(e) => {
                let missing = self.missing_values(descriptor, values);
                if missing.is_empty() {
                    log::error!("Error formatting message \"{}\": {}", descriptor.id, e);
                } else {
                    log::error!(
                        "Error formatting message \"{}\": {} (missing values: {})",
                        descriptor.id,
                        e,
                        missing.join(", ")
                    );
                }
                self.raw_template(descriptor)
            }
        }
    }

    /// Format a message, reporting formatting errors
    pub fn try_format_message(
        &self,
        descriptor: &MessageDescriptor,
        values: &Values,
    ) -> Result<String, FormatError> {
        let locale = self.locale();
        match self.data.messages.get(&descriptor.id) {
            Some(MessageRepr::Elements(elements)) => format_elements(elements, values, locale),
            Some(MessageRepr::Template(template)) => format_template(template, values, locale),
            None => {
                if locale != self.default_locale {
                    log::warn!(
                        "Missing message: \"{}\" for locale: \"{}\", using default message as fallback",
                        descriptor.id,
                        locale
                    );
                }
                format_template(descriptor.default_message(), values, locale)
            }
        }
    }

    fn missing_values(&self, descriptor: &MessageDescriptor, values: &Values) -> Vec<String> {
        let names = match self.data.messages.get(&descriptor.id) {
            Some(MessageRepr::Elements(elements)) => argument_names(elements),
            Some(MessageRepr::Template(template)) => {
                parse(template).map(|e| argument_names(&e)).unwrap_or_default()
            }
            None => parse(descriptor.default_message())
                .map(|e| argument_names(&e))
                .unwrap_or_default(),
        };
        names
            .into_iter()
            .filter(|name| !values.contains_key(name))
            .collect()
    }

    fn raw_template(&self, descriptor: &MessageDescriptor) -> String {
        match self.data.messages.get(&descriptor.id) {
            Some(MessageRepr::Template(template)) => template.clone(),
            _ => descriptor.default_message().to_string(),
        }
    }
}
