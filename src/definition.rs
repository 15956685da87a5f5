//! The resolved settings for one file, and how they combine.
//!
//! Priority: nearer config file > farther config file, and within one file
//! later section > earlier section. A field only inherits while it is
//! [`Setting::Absent`]; `unset` is a value of its own and stops inheritance.

use std::collections::BTreeMap;

use semver::Version;
use serde::{Serialize, Serializer};

use crate::error::FieldWarning;

pub const CHARSET: &str = "charset";
pub const INDENT_STYLE: &str = "indent_style";
pub const INDENT_SIZE: &str = "indent_size";
pub const TAB_WIDTH: &str = "tab_width";
pub const END_OF_LINE: &str = "end_of_line";
pub const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
pub const INSERT_FINAL_NEWLINE: &str = "insert_final_newline";

/// Sentinel value removing a property inherited from farther config files.
pub const UNSET: &str = "unset";

/// Values of `indent_style`.
pub mod indent_style {
    pub const TAB: &str = "tab";
    pub const SPACE: &str = "space";
}

/// Values of `end_of_line`.
pub mod end_of_line {
    pub const LF: &str = "lf";
    pub const CR: &str = "cr";
    pub const CRLF: &str = "crlf";
}

/// Values of `charset`.
pub mod charset {
    pub const LATIN1: &str = "latin1";
    pub const UTF_8: &str = "utf-8";
    pub const UTF_8_BOM: &str = "utf-8-bom";
    pub const UTF_16BE: &str = "utf-16be";
    pub const UTF_16LE: &str = "utf-16le";
}

fn is_unset(value: &str) -> bool {
    value.eq_ignore_ascii_case(UNSET)
}

/// A typed property that may be absent, explicitly `unset`, or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting<T> {
    /// Not declared; may still be inherited.
    Absent,
    /// Declared as `unset`; nothing is inherited.
    Unset,
    Value(T),
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Absent
    }
}

impl<T> Setting<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Setting::Absent)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Setting::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Setting::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Keep `self` unless it is absent.
    pub fn or(self, parent: Setting<T>) -> Setting<T> {
        match self {
            Setting::Absent => parent,
            other => other,
        }
    }
}

impl<T: ToString> Setting<T> {
    fn render(&self) -> Option<String> {
        match self {
            Setting::Absent => None,
            Setting::Unset => Some(UNSET.to_string()),
            Setting::Value(value) => Some(value.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Setting::Absent => serializer.serialize_none(),
            Setting::Unset => serializer.serialize_str(UNSET),
            Setting::Value(value) => value.serialize(serializer),
        }
    }
}

/// Settings resolved for one file.
///
/// Typed fields are derived from [`raw`](Self::raw), which keeps every
/// declared property (lower-cased name to literal value).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Definition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_style: Option<String>,
    /// A number, `tab` or `unset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_size: Option<String>,
    #[serde(skip_serializing_if = "Setting::is_absent")]
    pub tab_width: Setting<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_of_line: Option<String>,
    #[serde(skip_serializing_if = "Setting::is_absent")]
    pub trim_trailing_whitespace: Setting<bool>,
    #[serde(skip_serializing_if = "Setting::is_absent")]
    pub insert_final_newline: Setting<bool>,
    #[serde(skip)]
    pub raw: BTreeMap<String, String>,
    #[serde(skip)]
    pub(crate) version: Option<Version>,
}

impl Definition {
    /// Build the definition declared by one section.
    ///
    /// Values that fail to parse are reported as warnings and leave their
    /// field absent.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> (Self, Vec<FieldWarning>) {
        let mut warnings = Vec::new();
        let lower = |key: &str| properties.get(key).map(|value| value.to_lowercase());

        let trim_trailing_whitespace =
            parse_setting(properties, TRIM_TRAILING_WHITESPACE, parse_bool, &mut warnings);
        let insert_final_newline =
            parse_setting(properties, INSERT_FINAL_NEWLINE, parse_bool, &mut warnings);
        let indent_size = properties.get(INDENT_SIZE).cloned();

        // tab_width defaults to a numeric indent_size
        let tab_width = if properties.contains_key(TAB_WIDTH) {
            parse_setting(properties, TAB_WIDTH, parse_width, &mut warnings)
        } else {
            indent_size
                .as_deref()
                .and_then(|size| parse_width(size).ok())
                .map_or(Setting::Absent, Setting::Value)
        };

        let definition = Definition {
            charset: lower(CHARSET),
            indent_style: lower(INDENT_STYLE),
            indent_size,
            tab_width,
            end_of_line: lower(END_OF_LINE),
            trim_trailing_whitespace,
            insert_final_newline,
            raw: properties.clone(),
            version: None,
        };

        (definition, warnings)
    }

    /// Fill every field still absent in `self` from `parent`.
    pub fn merge(&mut self, parent: &Definition) {
        self.charset = self.charset.take().or_else(|| parent.charset.clone());
        self.indent_style = self
            .indent_style
            .take()
            .or_else(|| parent.indent_style.clone());
        self.indent_size = self
            .indent_size
            .take()
            .or_else(|| parent.indent_size.clone());
        self.tab_width = self.tab_width.or(parent.tab_width);
        self.end_of_line = self
            .end_of_line
            .take()
            .or_else(|| parent.end_of_line.clone());
        self.trim_trailing_whitespace = self
            .trim_trailing_whitespace
            .or(parent.trim_trailing_whitespace);
        self.insert_final_newline = self.insert_final_newline.or(parent.insert_final_newline);

        for (key, value) in &parent.raw {
            self.raw
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// `self` merged over `parent`.
    pub fn merged(mut self, parent: &Definition) -> Definition {
        self.merge(parent);
        self
    }

    /// Version the definition was resolved for, if the request named one.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Final `name -> value` properties, as an EditorConfig core reports them.
    ///
    /// Typed fields are written in normalized form. `indent_size` and
    /// `tab_width` are filled in from each other when only one is declared.
    pub fn properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();

        for (key, value) in &self.raw {
            let typed = match key.as_str() {
                CHARSET => self.charset.clone(),
                INDENT_STYLE => self.indent_style.clone(),
                INDENT_SIZE => self.indent_size.clone(),
                END_OF_LINE => self.end_of_line.clone(),
                TAB_WIDTH => self.tab_width.render(),
                TRIM_TRAILING_WHITESPACE => self.trim_trailing_whitespace.render(),
                INSERT_FINAL_NEWLINE => self.insert_final_newline.render(),
                _ => None,
            };
            properties.insert(key.clone(), typed.unwrap_or_else(|| value.clone()));
        }

        if !self.raw.contains_key(INDENT_SIZE) {
            match self.tab_width {
                Setting::Unset => {}
                Setting::Value(width) if width > 0 => {
                    properties.insert(INDENT_SIZE.to_string(), width.to_string());
                }
                _ if self.indent_style.as_deref() == Some(indent_style::TAB)
                    && self.reports_indent_size_tab() =>
                {
                    properties.insert(INDENT_SIZE.to_string(), indent_style::TAB.to_string());
                }
                _ => {}
            }
        }

        if !self.raw.contains_key(TAB_WIDTH) {
            match self.indent_size.as_deref() {
                Some(size) if is_unset(size) => {
                    properties.insert(TAB_WIDTH.to_string(), UNSET.to_string());
                }
                Some(size) if parse_width(size).is_ok() => {
                    properties.insert(TAB_WIDTH.to_string(), size.to_string());
                }
                _ => {}
            }
        }

        properties
    }

    /// `indent_size = tab` is only reported from version 0.9.0 on.
    fn reports_indent_size_tab(&self) -> bool {
        self.version
            .as_ref()
            .map_or(true, |version| *version >= Version::new(0, 9, 0))
    }
}

fn parse_setting<T>(
    properties: &BTreeMap<String, String>,
    key: &str,
    parse: fn(&str) -> Result<T, String>,
    warnings: &mut Vec<FieldWarning>,
) -> Setting<T> {
    match properties.get(key) {
        None => Setting::Absent,
        Some(value) if is_unset(value) => Setting::Unset,
        Some(value) => match parse(value) {
            Ok(parsed) => Setting::Value(parsed),
            Err(reason) => {
                warnings.push(FieldWarning::new(key, value, reason));
                Setting::Absent
            }
        },
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}

fn parse_width(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(width) if width > 0 => Ok(width),
        Ok(_) => Err("expected a positive integer".to_string()),
        Err(err) => Err(err.to_string()),
    }
}
