//! Reader for the INI dialect of `.editorconfig` files.

use super::{ConfigFile, Section};
use crate::error::SyntaxError;

/// Parse config file text into its sections.
///
/// Properties before the first section header form the preamble, where only
/// `root` is meaningful.
pub(super) fn parse(content: &str) -> Result<ConfigFile, SyntaxError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut file = ConfigFile::default();
    let mut current: Option<Section> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // Section header
        if line.starts_with('[') {
            let Some(selector) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
                return Err(SyntaxError::new(line_number, "unterminated section header"));
            };
            if let Some(section) = current.take() {
                file.sections.push(section);
            }
            current = Some(Section::new(selector.trim()));
            continue;
        }

        // Parse key = value
        let Some((key, value)) = line.split_once('=') else {
            return Err(SyntaxError::new(
                line_number,
                format!("expected `key = value`, found {line:?}"),
            ));
        };
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(SyntaxError::new(line_number, "missing property name"));
        }
        let value = value.trim();

        match current.as_mut() {
            Some(section) => {
                section.properties.insert(key, value.to_string());
            }
            None if key == "root" => file.root = value.eq_ignore_ascii_case("true"),
            None => {}
        }
    }

    if let Some(section) = current {
        file.sections.push(section);
    }

    Ok(file)
}
