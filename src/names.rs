//! Person name parsing.
//!
//! Author lists come from citation exports in a handful of shapes:
//! `"Last, First"`, `"Last, von, First"`, `"First Last"`, joined with `and`
//! or with commas. [`PersonNameParser`] splits such lists and pulls the
//! first and last names out of a single full name, so that imported authors
//! can be matched against the existing persons.
//!
//! # Example
//!
//! ```
//! use bibmerge::names::PersonNameParser;
//!
//! let parser = PersonNameParser::new();
//! let names = parser
//!     .parse_names("Kraker, de, Klaas Jan and Bidarra Rafael")
//!     .unwrap();
//! assert_eq!(names[0].first_name, "Klaas Jan");
//! assert_eq!(names[0].von.as_deref(), Some("de"));
//! assert_eq!(names[1].last_name, "Rafael");
//!
//! assert_eq!(parser.parse_first_name("J.C. Creput").as_deref(), Some("J. C."));
//! assert_eq!(parser.parse_last_name("I EL KHADIRI").as_deref(), Some("El Khadiri"));
//! ```

use crate::error::NameParseError;
use crate::regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// `Last, First` or `Last, von, First`.
const COMMA_NAME: &str = r"([^,]+?)(?:\s*,\s*([^,]+?))?\s*,\s*([^,]+?)";

/// `First Last`.
const PLAIN_NAME: &str = r"([^,]+?)\s+([^,]+?)";

const AND_SEPARATOR: &str = r"\s+AND\s+";

const COMMA_SEPARATOR: &str = r"\s*,\s*";

static COMMA_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{COMMA_NAME}$")).unwrap());

static PLAIN_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{PLAIN_NAME}$")).unwrap());

static AND_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){AND_SEPARATOR}")).unwrap());

static COMMA_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COMMA_SEPARATOR).unwrap());

static AND_LIST_OF_COMMA_NAMES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?i)^{COMMA_NAME}(?:{AND_SEPARATOR}{COMMA_NAME})*$"
    ))
    .unwrap()
});

static AND_LIST_OF_PLAIN_NAMES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?i)^{PLAIN_NAME}(?:{AND_SEPARATOR}{PLAIN_NAME})*$"
    ))
    .unwrap()
});

static COMMA_LIST_OF_PLAIN_NAMES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "^{PLAIN_NAME}(?:{COMMA_SEPARATOR}{PLAIN_NAME})*$"
    ))
    .unwrap()
});

/// Characters after which a word starts when formatting a name for display.
const NAME_DELIMITERS: [char; 9] = [' ', '\u{a0}', '\t', '\n', '\r', '\u{c}', '.', '-', '_'];

/// A person name extracted from an author list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first_name: String,
    /// Nobiliary particle, e.g. `de` in `"Kraker, de, Klaas Jan"`.
    pub von: Option<String>,
    pub last_name: String,
}

/// Parser for person names and author lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonNameParser;

impl PersonNameParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Splits a list of names.
    ///
    /// The list is read, in this order, as names with commas separated by
    /// `and`, as plain names separated by `and`, then as plain names
    /// separated by commas. A single name with two commas is read as
    /// `Last, von, First`. Empty input yields no name.
    ///
    /// # Errors
    ///
    /// Returns [`NameParseError::InvalidList`] if the text fits none of the
    /// list shapes, and [`NameParseError::UnrecognizedName`] if one of its
    /// names cannot be split into first and last name.
    pub fn parse_names(&self, text: &str) -> Result<Vec<PersonName>, NameParseError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let separator = if AND_LIST_OF_COMMA_NAMES_REGEX.is_match(text)
            || AND_LIST_OF_PLAIN_NAMES_REGEX.is_match(text)
        {
            &*AND_SEPARATOR_REGEX
        } else if COMMA_LIST_OF_PLAIN_NAMES_REGEX.is_match(text) {
            &*COMMA_SEPARATOR_REGEX
        } else {
            return Err(NameParseError::InvalidList(text.to_string()));
        };

        separator.split(text).map(parse_single_name).collect()
    }

    /// First name of a full name, or `None` if blank.
    ///
    /// With a comma the full name reads `Last, First`. Without one, the first
    /// component and the initials right after it form the first name.
    pub fn parse_first_name(&self, full_name: &str) -> Option<String> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return None;
        }

        let first_name = match full_name.split_once(',') {
            Some((_, first)) => components(first.trim()).join(" "),
            None => {
                let mut kept = Vec::new();
                for (index, component) in components(full_name).into_iter().enumerate() {
                    if index > 0 && !component.ends_with('.') {
                        break;
                    }
                    kept.push(component);
                }
                kept.join(" ")
            }
        };

        if !first_name.is_empty() {
            Some(first_name)
        } else if let Some((_, first)) = full_name.split_once(',') {
            non_empty(first.trim())
        } else {
            non_empty(full_name)
        }
    }

    /// Last name of a full name, or `None` if there is none.
    ///
    /// With a comma the full name reads `Last, First`. Without one, the
    /// last name is everything after the first component and the initials
    /// following it.
    pub fn parse_last_name(&self, full_name: &str) -> Option<String> {
        let full_name = full_name.trim();
        if full_name.is_empty() {
            return None;
        }

        let last_name = match full_name.split_once(',') {
            Some((last, _)) => components(last.trim()).join(" "),
            None => {
                let mut in_first_name = true;
                let mut kept = Vec::new();
                for (index, component) in components(full_name).into_iter().enumerate() {
                    if in_first_name && component.ends_with('.') {
                        continue;
                    }
                    in_first_name = false;
                    if index > 0 {
                        kept.push(component);
                    }
                }
                kept.join(" ")
            }
        };

        non_empty(&last_name)
    }

    /// Capitalizes every word of a name, lower-casing the rest.
    ///
    /// Dots, hyphens and underscores start a new word, so `"j.-p. éyZ"`
    /// becomes `"J.-P. Éyz"`.
    pub fn format_name_for_display(&self, name: &str) -> String {
        let mut formatted = String::with_capacity(name.len());
        let mut word_start = true;
        for c in name.trim().chars() {
            if NAME_DELIMITERS.contains(&c) {
                formatted.push(c);
                word_start = true;
            } else if word_start {
                formatted.extend(c.to_uppercase());
                word_start = false;
            } else {
                formatted.extend(c.to_lowercase());
            }
        }
        formatted
    }
}

fn parse_single_name(name: &str) -> Result<PersonName, NameParseError> {
    if let Some(captures) = COMMA_NAME_REGEX.captures(name) {
        let last_name = captures.get(1).map_or("", |m| m.as_str());
        let first_name = captures.get(3).map_or("", |m| m.as_str());
        if !first_name.is_empty() && !last_name.is_empty() {
            return Ok(PersonName {
                first_name: first_name.to_string(),
                von: captures
                    .get(2)
                    .map(|m| m.as_str())
                    .filter(|von| !von.is_empty())
                    .map(str::to_string),
                last_name: last_name.to_string(),
            });
        }
    } else if let Some(captures) = PLAIN_NAME_REGEX.captures(name) {
        let first_name = captures.get(1).map_or("", |m| m.as_str());
        let last_name = captures.get(2).map_or("", |m| m.as_str());
        if !first_name.is_empty() && !last_name.is_empty() {
            return Ok(PersonName {
                first_name: first_name.to_string(),
                von: None,
                last_name: last_name.to_string(),
            });
        }
    }
    Err(NameParseError::UnrecognizedName(name.to_string()))
}

/// Splits a name into formatted components.
///
/// Hyphenated words stay one component (`"P-J"` gives `"P.-J."`), dotted
/// initials are split (`"J.C."` gives `"J."` and `"C."`), single letters
/// become initials and other words are capitalized.
fn components(name: &str) -> Vec<String> {
    let mut components = Vec::new();
    for word in name.split_whitespace() {
        let subwords: Vec<&str> = word.split('-').filter(|s| !s.is_empty()).collect();
        let mut parts = Vec::new();
        for subword in &subwords {
            parts.extend(
                subword
                    .split('.')
                    .filter(|particle| !particle.is_empty())
                    .map(format_particle),
            );
        }
        if subwords.len() > 1 {
            components.push(parts.join("-"));
        } else {
            components.extend(parts);
        }
    }
    components
}

fn format_particle(particle: &str) -> String {
    let mut chars = particle.chars();
    let Some(initial) = chars.next() else {
        return String::new();
    };
    let mut formatted: String = initial.to_uppercase().collect();
    if chars.as_str().is_empty() {
        formatted.push('.');
    } else {
        formatted.extend(chars.flat_map(char::to_lowercase));
    }
    formatted
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
