//! Render configuration.
//!
//! A [`RenderConfig`] is immutable once built. It is produced either through
//! [`RenderConfig::builder`] or from a JSON document; both paths share the same
//! validation, so negative or zero limits fail here and never mid-render.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::emitter::Layout;
use crate::error::ConfigError;

pub const DEFAULT_MAX_DEPTH: usize = 6;
pub const DEFAULT_MAX_CONTAINER_WIDTH: usize = 10;
pub const DEFAULT_MAX_TOTAL_LENGTH: usize = 4096;
pub const DEFAULT_TRUNCATE_STRING_LENGTH: usize = 200;

/// Quote character used for rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn quote_char(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }
}

/// Spellings for the null and boolean literals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Literals {
    pub null: String,
    #[serde(rename = "true")]
    pub true_text: String,
    #[serde(rename = "false")]
    pub false_text: String,
}

impl Literals {
    pub fn new(
        null: impl Into<String>,
        true_text: impl Into<String>,
        false_text: impl Into<String>,
    ) -> Self {
        Self {
            null: null.into(),
            true_text: true_text.into(),
            false_text: false_text.into(),
        }
    }

    /// `None` / `True` / `False`
    pub fn capitalized() -> Self {
        Self::new("None", "True", "False")
    }
}

impl Default for Literals {
    fn default() -> Self {
        Self::new("null", "true", "false")
    }
}

/// Immutable limits and formatting options for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    max_depth: usize,
    max_container_width: usize,
    max_total_length: usize,
    quote_style: QuoteStyle,
    truncate_string_length: usize,
    escape_unicode: bool,
    literals: Literals,
    indent: Option<usize>,
    rshift: usize,
    separators: Option<(String, String)>,
    string_bypass: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_container_width: DEFAULT_MAX_CONTAINER_WIDTH,
            max_total_length: DEFAULT_MAX_TOTAL_LENGTH,
            quote_style: QuoteStyle::default(),
            truncate_string_length: DEFAULT_TRUNCATE_STRING_LENGTH,
            escape_unicode: false,
            literals: Literals::default(),
            indent: None,
            rshift: 0,
            separators: None,
            string_bypass: false,
        }
    }
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Parses a JSON config document. Absent fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let builder: RenderConfigBuilder = serde_json::from_str(text)?;
        builder.build()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        RenderConfigBuilder::from_file(path)?.build()
    }

    /// `<config dir>/xdumps/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xdumps").join("config.json"))
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_container_width(&self) -> usize {
        self.max_container_width
    }

    pub fn max_total_length(&self) -> usize {
        self.max_total_length
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.quote_style
    }

    pub fn truncate_string_length(&self) -> usize {
        self.truncate_string_length
    }

    pub fn escape_unicode(&self) -> bool {
        self.escape_unicode
    }

    pub fn literals(&self) -> &Literals {
        &self.literals
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    pub fn rshift(&self) -> usize {
        self.rshift
    }

    /// Item and key separators given explicitly, if any.
    pub fn separators(&self) -> Option<(&str, &str)> {
        self.separators
            .as_ref()
            .map(|(item, key)| (item.as_str(), key.as_str()))
    }

    /// A top-level string is written as-is, unquoted and unescaped.
    pub fn string_bypass(&self) -> bool {
        self.string_bypass
    }

    pub fn layout(&self) -> Layout {
        let layout = match self.indent {
            Some(indent) => Layout::pretty(indent),
            None => Layout::compact(),
        };
        self.with_separators(layout.with_rshift(self.rshift))
    }

    /// One-line layout for text that is embedded in another line, such as
    /// a non-scalar mapping key.
    pub fn inline_layout(&self) -> Layout {
        self.with_separators(Layout::compact())
    }

    fn with_separators(&self, layout: Layout) -> Layout {
        match &self.separators {
            Some((item, key)) => layout.with_separators(item.clone(), key.clone()),
            None => layout,
        }
    }
}

/// Unvalidated configuration.
///
/// Limits are signed so that a negative value coming from a config file or
/// the command line is reported precisely instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfigBuilder {
    max_depth: Option<i64>,
    max_container_width: Option<i64>,
    max_total_length: Option<i64>,
    quote_style: Option<QuoteStyle>,
    truncate_string_length: Option<i64>,
    escape_unicode: Option<bool>,
    literals: Option<Literals>,
    indent: Option<i64>,
    rshift: Option<i64>,
    separators: Option<(String, String)>,
    string_bypass: Option<bool>,
}

impl RenderConfigBuilder {
    /// Reads a JSON config document. Nothing is validated until
    /// [`RenderConfigBuilder::build`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded render config");
        Ok(serde_json::from_str(&text)?)
    }

    /// [`RenderConfigBuilder::from_file`] on `path`, or an empty builder
    /// when there is no file there.
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn max_depth(mut self, value: i64) -> Self {
        self.max_depth = Some(value);
        self
    }

    pub fn max_container_width(mut self, value: i64) -> Self {
        self.max_container_width = Some(value);
        self
    }

    pub fn max_total_length(mut self, value: i64) -> Self {
        self.max_total_length = Some(value);
        self
    }

    pub fn quote_style(mut self, style: QuoteStyle) -> Self {
        self.quote_style = Some(style);
        self
    }

    pub fn truncate_string_length(mut self, value: i64) -> Self {
        self.truncate_string_length = Some(value);
        self
    }

    pub fn escape_unicode(mut self, enabled: bool) -> Self {
        self.escape_unicode = Some(enabled);
        self
    }

    pub fn literals(mut self, literals: Literals) -> Self {
        self.literals = Some(literals);
        self
    }

    /// `None` selects compact single-line output.
    pub fn indent(mut self, value: Option<i64>) -> Self {
        self.indent = value;
        self
    }

    pub fn rshift(mut self, value: i64) -> Self {
        self.rshift = Some(value);
        self
    }

    /// Overrides the item and mapping key separators, `(", ", ": ")` on one
    /// line and `(",", ": ")` in pretty layouts by default.
    pub fn separators(mut self, item: impl Into<String>, key: impl Into<String>) -> Self {
        self.separators = Some((item.into(), key.into()));
        self
    }

    pub fn string_bypass(mut self, enabled: bool) -> Self {
        self.string_bypass = Some(enabled);
        self
    }

    /// Overlays every field set on `other` onto `self`.
    pub fn merge(mut self, other: RenderConfigBuilder) -> Self {
        self.max_depth = other.max_depth.or(self.max_depth);
        self.max_container_width = other.max_container_width.or(self.max_container_width);
        self.max_total_length = other.max_total_length.or(self.max_total_length);
        self.quote_style = other.quote_style.or(self.quote_style);
        self.truncate_string_length = other
            .truncate_string_length
            .or(self.truncate_string_length);
        self.escape_unicode = other.escape_unicode.or(self.escape_unicode);
        self.literals = other.literals.or(self.literals);
        self.indent = other.indent.or(self.indent);
        self.rshift = other.rshift.or(self.rshift);
        self.separators = other.separators.or(self.separators);
        self.string_bypass = other.string_bypass.or(self.string_bypass);
        self
    }

    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        let defaults = RenderConfig::default();

        let max_total_length =
            non_negative("max_total_length", self.max_total_length, defaults.max_total_length)?;
        if max_total_length == 0 {
            return Err(ConfigError::Zero {
                field: "max_total_length",
            });
        }

        let indent = match self.indent {
            Some(value) => Some(non_negative("indent", Some(value), 0)?),
            None => None,
        };

        Ok(RenderConfig {
            max_depth: non_negative("max_depth", self.max_depth, defaults.max_depth)?,
            max_container_width: non_negative(
                "max_container_width",
                self.max_container_width,
                defaults.max_container_width,
            )?,
            max_total_length,
            quote_style: self.quote_style.unwrap_or(defaults.quote_style),
            truncate_string_length: non_negative(
                "truncate_string_length",
                self.truncate_string_length,
                defaults.truncate_string_length,
            )?,
            escape_unicode: self.escape_unicode.unwrap_or(defaults.escape_unicode),
            literals: self.literals.unwrap_or(defaults.literals),
            indent,
            rshift: non_negative("rshift", self.rshift, defaults.rshift)?,
            separators: self.separators,
            string_bypass: self.string_bypass.unwrap_or(defaults.string_bypass),
        })
    }
}

fn non_negative(
    field: &'static str,
    value: Option<i64>,
    default: usize,
) -> Result<usize, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => {
            usize::try_from(value).map_err(|_| ConfigError::Negative { field, value })
        }
    }
}
