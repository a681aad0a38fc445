use std::borrow::Cow;
use std::fmt::Write as _;
use std::time::Duration;

use crate::config::RenderConfig;

/// Formats scalar values into literal text.
///
/// Text and bytes come back together with the number of characters (or
/// bytes) cut by `truncate_string_length`, so the caller can emit the
/// matching `Truncated` suffix.
pub struct ScalarRenderer<'a> {
    config: &'a RenderConfig,
}

impl<'a> ScalarRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    pub fn null(&self) -> String {
        self.config.literals().null.clone()
    }

    pub fn boolean(&self, value: bool) -> String {
        let literals = self.config.literals();
        if value {
            literals.true_text.clone()
        } else {
            literals.false_text.clone()
        }
    }

    /// Shortest text that reads back as the same float.
    pub fn float(&self, value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value == f64::INFINITY {
            "Infinity".to_string()
        } else if value == f64::NEG_INFINITY {
            "-Infinity".to_string()
        } else {
            format!("{value:?}")
        }
    }

    /// `1d:2h:03m:04s`; leading zero units are dropped, seconds always shown.
    pub fn duration(&self, value: Duration) -> String {
        let total = value.as_secs();
        let (days, rest) = (total / 86_400, total % 86_400);
        let (hours, rest) = (rest / 3_600, rest % 3_600);
        let (minutes, seconds) = (rest / 60, rest % 60);

        let mut out = String::new();
        if days > 0 {
            let _ = write!(out, "{days}d:");
        }
        if hours > 0 || !out.is_empty() {
            let _ = write!(out, "{hours}h:");
        }
        if minutes > 0 || !out.is_empty() {
            let _ = write!(out, "{minutes:02}m:");
        }
        let _ = write!(out, "{seconds:02}s");
        out
    }

    /// Quoted, escaped and truncated string literal.
    pub fn text(&self, value: &str) -> (String, usize) {
        let (kept, omitted) = self.truncate(value);
        (self.quote(&kept), omitted)
    }

    /// Quoted and escaped, never truncated.
    pub fn quote(&self, value: &str) -> String {
        let quote = self.config.quote_style().quote_char();
        let mut out = String::with_capacity(value.len() + 2);
        out.push(quote);
        out.push_str(&self.escape(value));
        out.push(quote);
        out
    }

    /// Escapes `value` for a single line without adding quotes.
    pub fn escape(&self, value: &str) -> String {
        let quote = self.config.quote_style().quote_char();
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c == quote => {
                    out.push('\\');
                    out.push(c);
                }
                c if c.is_control() => {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                }
                c if !c.is_ascii() && self.config.escape_unicode() => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        let _ = write!(out, "\\u{unit:04x}");
                    }
                }
                c => out.push(c),
            }
        }
        out
    }

    /// Keeps at most `truncate_string_length` characters of `value`.
    pub fn truncate<'v>(&self, value: &'v str) -> (Cow<'v, str>, usize) {
        let limit = self.config.truncate_string_length();
        let total = value.chars().count();
        if total <= limit {
            return (Cow::Borrowed(value), 0);
        }
        (value.chars().take(limit).collect(), total - limit)
    }

    /// `b"..."` with printable ASCII kept and everything else as `\xNN`.
    pub fn bytes(&self, value: &[u8]) -> (String, usize) {
        let limit = self.config.truncate_string_length();
        let (kept, omitted) = if value.len() > limit {
            (&value[..limit], value.len() - limit)
        } else {
            (value, 0)
        };

        let quote = self.config.quote_style().quote_char();
        let mut out = String::with_capacity(kept.len() + 3);
        out.push('b');
        out.push(quote);
        for &byte in kept {
            match byte {
                b'\\' => out.push_str("\\\\"),
                b'\n' => out.push_str("\\n"),
                b'\r' => out.push_str("\\r"),
                b'\t' => out.push_str("\\t"),
                b if char::from(b) == quote => {
                    out.push('\\');
                    out.push(quote);
                }
                0x20..=0x7e => out.push(char::from(byte)),
                _ => {
                    let _ = write!(out, "\\x{byte:02x}");
                }
            }
        }
        out.push(quote);
        (out, omitted)
    }
}
