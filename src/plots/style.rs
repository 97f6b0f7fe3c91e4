//! Plot styles.
//!
//! A style is a set of `key : value` entries in an rc file. Figures name a
//! bundled style (`light` or `dark`) or point at their own file, and may add
//! inline overrides. The merged result is acquired as a [`StyleScope`] for
//! one show/save call and handed to the backend; nothing is installed
//! globally.

use crate::error::{PanoplotError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const LIGHT_RC: &str = include_str!("styles/light.rc");
const DARK_RC: &str = include_str!("styles/dark.rc");

/// Name of a bundled style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleName {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl StyleName {
    /// Style name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Path of the bundled rc resource, relative to the style directory.
    pub fn resource(self) -> String {
        format!("styles/{}.rc", self.name())
    }

    fn source(self) -> &'static str {
        match self {
            Self::Light => LIGHT_RC,
            Self::Dark => DARK_RC,
        }
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleName {
    type Err = PanoplotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(PanoplotError::configuration(format!(
                "unknown style '{}', expected 'light' or 'dark'",
                other
            ))),
        }
    }
}

/// Where a figure's style entries come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// Bundled rc resource.
    Bundled(StyleName),
    /// Caller-supplied rc file.
    File(PathBuf),
}

impl StyleSource {
    /// Resolve a style: an explicit file takes precedence over the name.
    pub fn resolve(name: StyleName, file: Option<&Path>) -> Self {
        match file {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Bundled(name),
        }
    }

    /// Load the style entries.
    pub fn load(&self) -> Result<StyleSheet> {
        match self {
            Self::Bundled(name) => StyleSheet::parse(name.source()),
            Self::File(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| PanoplotError::style_file(path.clone(), e))?;
                StyleSheet::parse(&text)
            }
        }
    }
}

impl fmt::Display for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled(name) => write!(f, "{}", name.resource()),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parsed `key : value` style entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    entries: BTreeMap<String, String>,
}

impl StyleSheet {
    /// Parse rc text. Blank lines and `#` comments are skipped; a `#`
    /// directly after the separator starts a color value, not a comment.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();

        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| PanoplotError::MalformedStyle {
                line: n + 1,
                text: raw.to_string(),
            })?;

            let value = strip_comment(value.trim());
            let key = key.trim();
            if key.is_empty() {
                return Err(PanoplotError::MalformedStyle {
                    line: n + 1,
                    text: raw.to_string(),
                });
            }
            entries.insert(key.to_string(), value.to_string());
        }

        Ok(Self { entries })
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn merge(&mut self, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

fn strip_comment(value: &str) -> &str {
    // "#rrggbb # comment" keeps the color
    let start = usize::from(value.starts_with('#'));
    match value[start..].find(" #") {
        Some(i) => value[..start + i].trim_end(),
        None => value,
    }
}

/// Style entries in effect for a single show or save call.
///
/// Acquired from the figure's style source and overrides, passed by
/// reference into the backend, and released when dropped.
#[derive(Debug)]
pub struct StyleScope {
    source: StyleSource,
    sheet: StyleSheet,
}

impl StyleScope {
    /// Load the style source and apply inline overrides on top.
    pub fn acquire(source: &StyleSource, overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut sheet = source.load()?;
        sheet.merge(overrides);
        debug!(
            "Acquired style scope from {} ({} entries, {} overrides)",
            source,
            sheet.len(),
            overrides.len()
        );
        Ok(Self {
            source: source.clone(),
            sheet,
        })
    }

    /// Where the base entries came from.
    pub fn source(&self) -> &StyleSource {
        &self.source
    }

    /// Look up an entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.sheet.get(key)
    }

    /// Merged entries.
    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }
}

impl Drop for StyleScope {
    fn drop(&mut self) {
        debug!("Released style scope from {}", self.source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_styles_parse() {
        for name in [StyleName::Light, StyleName::Dark] {
            let sheet = StyleSource::Bundled(name).load().unwrap();
            assert!(sheet.get("text.color").is_some());
            assert!(sheet.get("image.cmap").is_some());
        }
    }

    #[test]
    fn unknown_style_name_is_rejected() {
        assert!(matches!(
            "solarized".parse::<StyleName>(),
            Err(PanoplotError::Configuration(_))
        ));
        assert_eq!("dark".parse::<StyleName>().unwrap(), StyleName::Dark);
    }

    #[test]
    fn colors_survive_comment_stripping() {
        let sheet = StyleSheet::parse("lines.color : #ff0000 # red\naxes.grid: true # on").unwrap();
        assert_eq!(sheet.get("lines.color"), Some("#ff0000"));
        assert_eq!(sheet.get("axes.grid"), Some("true"));
    }

    #[test]
    fn malformed_line_reports_position() {
        let err = StyleSheet::parse("# header\n\nnot a pair").unwrap_err();
        assert!(matches!(err, PanoplotError::MalformedStyle { line: 3, .. }));
    }

    #[test]
    fn explicit_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "text.color : red").unwrap();

        let source = StyleSource::resolve(StyleName::Dark, Some(file.path()));
        assert_eq!(source, StyleSource::File(file.path().to_path_buf()));

        let scope = StyleScope::acquire(&source, &BTreeMap::new()).unwrap();
        assert_eq!(scope.get("text.color"), Some("red"));
        assert_eq!(scope.get("image.cmap"), None);
    }

    #[test]
    fn overrides_win() {
        let mut overrides = BTreeMap::new();
        overrides.insert("image.cmap".to_string(), "bwr".to_string());
        let scope = StyleScope::acquire(&StyleSource::Bundled(StyleName::Light), &overrides).unwrap();
        assert_eq!(scope.get("image.cmap"), Some("bwr"));
    }

    #[test]
    fn missing_style_file_is_an_error() {
        let source = StyleSource::File(PathBuf::from("/nonexistent/panoplot.rc"));
        assert!(matches!(source.load(), Err(PanoplotError::StyleFile { .. })));
    }
}
