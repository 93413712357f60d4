//! Diagnostic notation (RFC 8949 §8).
//!
//! The flat form is the [`Display`](core::fmt::Display) output of an [`Item`]. The laid-out form
//! breaks groups over several lines once their content gets long, and in annotate mode adds tag
//! names and date renderings as `/ comment /` trailers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::tags::{TagResolver, TAG_DATE};
use crate::{Item, Simple};

const INDENT: usize = 3;
const MAX_SINGLE_LINE: usize = 20;

enum DiagItem {
    Item(String),
    Group {
        begin: String,
        end: &'static str,
        items: Vec<DiagItem>,
        is_pairs: bool,
        comment: Option<String>,
    },
}

impl DiagItem {
    fn format(&self, level: usize, separator: &str) -> String {
        match self {
            Self::Item(s) => format_line(level, s, separator, None),
            Self::Group { .. } => {
                if self.contains_group()
                    || self.total_len() > MAX_SINGLE_LINE
                    || self.greatest_len() > MAX_SINGLE_LINE
                {
                    self.multiline(level, separator)
                } else {
                    self.single_line(level, separator)
                }
            }
        }
    }

    fn single_line(&self, level: usize, separator: &str) -> String {
        match self {
            Self::Item(s) => format_line(level, s, separator, None),
            Self::Group {
                begin,
                end,
                items,
                is_pairs,
                comment,
            } => {
                let mut line = begin.clone();
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        line.push_str(if *is_pairs && index % 2 == 1 { ": " } else { ", " });
                    }
                    match item {
                        Self::Item(s) => line.push_str(s),
                        Self::Group { .. } => line.push_str("<group>"),
                    }
                }
                line.push_str(end);
                format_line(level, &line, separator, comment.as_deref())
            }
        }
    }

    fn multiline(&self, level: usize, separator: &str) -> String {
        match self {
            Self::Item(s) => s.clone(),
            Self::Group {
                begin,
                end,
                items,
                is_pairs,
                comment,
            } => {
                let mut lines = Vec::with_capacity(items.len() + 2);
                lines.push(format_line(level, begin, "", comment.as_deref()));
                for (index, item) in items.iter().enumerate() {
                    let sep = if index + 1 == items.len() {
                        ""
                    } else if *is_pairs && index % 2 == 0 {
                        ":"
                    } else {
                        ","
                    };
                    lines.push(item.format(level + 1, sep));
                }
                lines.push(format_line(level, end, separator, None));
                lines.join("\n")
            }
        }
    }

    fn total_len(&self) -> usize {
        match self {
            Self::Item(s) => s.chars().count(),
            Self::Group { items, .. } => items.iter().map(Self::total_len).sum(),
        }
    }

    fn greatest_len(&self) -> usize {
        match self {
            Self::Item(s) => s.chars().count(),
            Self::Group { items, .. } => items.iter().map(Self::total_len).max().unwrap_or(0),
        }
    }

    fn contains_group(&self) -> bool {
        match self {
            Self::Item(_) => false,
            Self::Group { items, .. } => items.iter().any(|i| matches!(i, Self::Group { .. })),
        }
    }
}

fn format_line(level: usize, s: &str, separator: &str, comment: Option<&str>) -> String {
    let mut line = " ".repeat(level * INDENT);
    line.push_str(s);
    line.push_str(separator);
    if let Some(comment) = comment {
        line.push_str("   / ");
        line.push_str(comment);
        line.push_str(" /");
    }
    line
}

/// Whole seconds at or below `v`, when they fit an `i64`.
fn floor_seconds(v: f64) -> Option<i64> {
    if !v.is_finite() || !(-9.2e18..9.2e18).contains(&v) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let t = v as i64;
    #[allow(clippy::cast_precision_loss)]
    let back = t as f64;
    Some(if back > v { t - 1 } else { t })
}

/// ISO-8601 rendering of an epoch-seconds item, truncated to whole seconds.
fn date_text(item: &Item) -> Option<String> {
    let secs = floor_seconds(item.as_f64()?)?;
    let dt = DateTime::<Utc>::from_timestamp(secs, 0)?;
    Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn diag_item(item: &Item, annotate: bool, tags: Option<&dyn TagResolver>) -> DiagItem {
    match item {
        Item::Tagged(tag, inner) => {
            let content = if annotate && *tag == TAG_DATE {
                date_text(inner).map(DiagItem::Item)
            } else {
                None
            };
            let content = content.unwrap_or_else(|| diag_item(inner, annotate, tags));
            let comment = if annotate {
                tags.and_then(|t| t.assigned_name(*tag)).map(ToString::to_string)
            } else {
                None
            };
            DiagItem::Group {
                begin: alloc::format!("{tag}("),
                end: ")",
                items: alloc::vec![content],
                is_pairs: false,
                comment,
            }
        }
        Item::Array(items) => DiagItem::Group {
            begin: "[".into(),
            end: "]",
            items: items
                .iter()
                .map(|i| diag_item(i, annotate, tags))
                .collect(),
            is_pairs: false,
            comment: None,
        },
        Item::Map(map) => DiagItem::Group {
            begin: "{".into(),
            end: "}",
            items: map
                .iter()
                .flat_map(|(k, v)| [diag_item(k, annotate, tags), diag_item(v, annotate, tags)])
                .collect(),
            is_pairs: true,
            comment: None,
        },
        _ => DiagItem::Item(item.to_string()),
    }
}

impl Item {
    /// Flat diagnostic notation, identical to the `Display` output.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }

    /// Diagnostic notation laid out over several lines where groups get long.
    ///
    /// With `annotate`, tagged items carry their resolved name as a `/ name /` comment and tag-1
    /// dates render as ISO-8601 timestamps.
    #[must_use]
    pub fn diagnostic_opt(&self, annotate: bool, tags: Option<&dyn TagResolver>) -> String {
        diag_item(self, annotate, tags).format(0, "")
    }
}

fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".into()
    } else if v == f64::INFINITY {
        "Infinity".into()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".into()
    } else {
        alloc::format!("{v:?}")
    }
}

/// Quoted text with JSON-style escapes, so the flat form stays unambiguous.
fn write_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if u32::from(c) < 0x20 => write!(f, "\\u{:04x}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Negative(n) => write!(f, "{}", -1 - i128::from(*n)),
            Self::ByteString(b) => write!(f, "h'{}'", hex::encode(b)),
            Self::TextString(s) => write_text(f, s),
            Self::Array(items) => {
                f.write_char('[')?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_char(']')
            }
            Self::Map(map) => {
                f.write_char('{')?;
                for (index, (k, v)) in map.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_char('}')
            }
            Self::Tagged(tag, inner) => write!(f, "{tag}({inner})"),
            Self::Simple(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl fmt::Display for Simple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::False => f.write_str("false"),
            Self::True => f.write_str("true"),
            Self::Null => f.write_str("null"),
            Self::Float(v) => f.write_str(&format_float(v.get())),
        }
    }
}
