//! Demo page
//!
//! Renders the language selector and the sample messages as plain text.
//! The page is rebuilt from scratch for every loaded locale.

use super::provider::{Intl, MessageDescriptor};
use crate::config::SupportedLocale;
use crate::icu::{values, Values};

/// A message display site: what to show and with which values
pub struct MessageSite {
    pub heading: &'static str,
    pub descriptor: MessageDescriptor,
    pub values: Values,
}

/// The sample messages shown on the page
pub fn sample_messages() -> Vec<MessageSite> {
    vec![
        MessageSite {
            heading: "Declared at the display site",
            descriptor: MessageDescriptor::new("user.userName", "My name is {name}")
                .with_description("User name"),
            values: values([("name", "Akash")]),
        },
        MessageSite {
            heading: "Formatted imperatively",
            descriptor: MessageDescriptor::new("user.designation", "My designation is {designation}")
                .with_description("Designation"),
            values: values([("designation", "Software Developer")]),
        },
        MessageSite {
            heading: "Pre-declared for later use",
            descriptor: MessageDescriptor::new("user.location", "My location is {place}")
                .with_description("Location"),
            values: values([("place", "India")]),
        },
    ]
}

/// Render the whole page for the locale `intl` was built with
pub fn render_page(intl: &Intl, supported: &[SupportedLocale]) -> String {
    let mut out = String::new();

    out.push_str("Select language\n");
    for locale in supported {
        let marker = if locale.code == intl.locale() { "*" } else { " " };
        out.push_str(&format!("  [{}] {} ({})\n", marker, locale.name, locale.code));
    }

    out.push_str("\nTypes of message declaration\n");
    for (index, site) in sample_messages().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, site.heading));
        out.push_str(&format!(
            "     {}\n",
            intl.format_message(&site.descriptor, &site.values)
        ));
    }

    out
}
