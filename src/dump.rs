//! Hex dumps of canonical encodings.
//!
//! The annotated form prints one line per header and per string payload, indented by nesting
//! level, with a `# note` column naming what each line encodes.

use alloc::string::String;
use alloc::vec::Vec;

use crate::header::{header_bytes, MajorType};
use crate::tags::TagResolver;
use crate::Item;

const INDENT: usize = 3;
const MAX_NOTE_COLUMN: usize = 40;

struct DumpItem {
    level: usize,
    data: Vec<Vec<u8>>,
    note: Option<String>,
}

impl DumpItem {
    fn new(level: usize, data: Vec<Vec<u8>>, note: Option<String>) -> Self {
        Self { level, data, note }
    }

    fn first_column(&self) -> String {
        let mut col = " ".repeat(self.level * INDENT);
        let parts: Vec<String> = self
            .data
            .iter()
            .filter(|d| !d.is_empty())
            .map(hex::encode)
            .collect();
        col.push_str(&parts.join(" "));
        col
    }

    fn format(&self, note_column: usize) -> String {
        let mut line = self.first_column();
        if let Some(note) = &self.note {
            let width = line.chars().count();
            let padding = (note_column.min(MAX_NOTE_COLUMN) + 1)
                .saturating_sub(width)
                .max(1);
            line.push_str(&" ".repeat(padding));
            line.push_str("# ");
            line.push_str(note);
        }
        line
    }
}

/// Header split as initial byte plus argument bytes.
fn split_header(major: MajorType, value: u64) -> Vec<Vec<u8>> {
    let mut header = header_bytes(major, value);
    let rest = header.split_off(1);
    alloc::vec![header, rest]
}

fn quoted(s: &str) -> String {
    alloc::format!("\"{s}\"")
}

/// Printable rendering of `bytes` when they are UTF-8 with at least one printable character.
fn sanitized(bytes: &[u8]) -> Option<String> {
    let s = core::str::from_utf8(bytes).ok()?;
    let mut has_printable = false;
    let out: String = s
        .chars()
        .map(|c| {
            if !c.is_ascii() || (' '..='~').contains(&c) {
                has_printable = true;
                c
            } else {
                '.'
            }
        })
        .collect();
    has_printable.then_some(out)
}

fn len_u64(len: usize) -> u64 {
    len as u64
}

fn dump_items(item: &Item, level: usize, tags: Option<&dyn TagResolver>, out: &mut Vec<DumpItem>) {
    match item {
        Item::Unsigned(u) => out.push(DumpItem::new(
            level,
            alloc::vec![item.to_cbor_data()],
            Some(alloc::format!("unsigned({u})")),
        )),
        Item::Negative(n) => out.push(DumpItem::new(
            level,
            alloc::vec![item.to_cbor_data()],
            Some(alloc::format!("negative({})", -1 - i128::from(*n))),
        )),
        Item::ByteString(b) => {
            out.push(DumpItem::new(
                level,
                alloc::vec![header_bytes(MajorType::ByteString, len_u64(b.len()))],
                Some(alloc::format!("bytes({})", b.len())),
            ));
            if !b.is_empty() {
                let note = sanitized(b).map(|s| quoted(&s));
                out.push(DumpItem::new(level + 1, alloc::vec![b.clone()], note));
            }
        }
        Item::TextString(s) => {
            let data = s.as_bytes();
            out.push(DumpItem::new(
                level,
                split_header(MajorType::TextString, len_u64(data.len())),
                Some(alloc::format!("text({})", data.len())),
            ));
            out.push(DumpItem::new(
                level + 1,
                alloc::vec![data.to_vec()],
                Some(quoted(s)),
            ));
        }
        Item::Array(items) => {
            out.push(DumpItem::new(
                level,
                split_header(MajorType::Array, len_u64(items.len())),
                Some(alloc::format!("array({})", items.len())),
            ));
            for child in items {
                dump_items(child, level + 1, tags, out);
            }
        }
        Item::Map(map) => {
            out.push(DumpItem::new(
                level,
                split_header(MajorType::Map, len_u64(map.len())),
                Some(alloc::format!("map({})", map.len())),
            ));
            for (k, v) in map {
                dump_items(k, level + 1, tags, out);
                dump_items(v, level + 1, tags, out);
            }
        }
        Item::Tagged(tag, inner) => {
            let note = match tags.and_then(|t| t.assigned_name(*tag)) {
                Some(name) => alloc::format!("tag({tag}) {name}"),
                None => alloc::format!("tag({tag})"),
            };
            out.push(DumpItem::new(
                level,
                split_header(MajorType::Tagged, *tag),
                Some(note),
            ));
            dump_items(inner, level + 1, tags, out);
        }
        Item::Simple(v) => out.push(DumpItem::new(
            level,
            alloc::vec![item.to_cbor_data()],
            Some(alloc::format!("{v}")),
        )),
    }
}

impl Item {
    /// Lowercase hex of the canonical encoding.
    #[must_use]
    pub fn hex(&self) -> String {
        hex::encode(self.to_cbor_data())
    }

    /// Hex of the canonical encoding; with `annotate`, one structural line per header or payload
    /// with an aligned `# note` column.
    #[must_use]
    pub fn hex_opt(&self, annotate: bool, tags: Option<&dyn TagResolver>) -> String {
        if !annotate {
            return self.hex();
        }
        let mut items = Vec::new();
        dump_items(self, 0, tags, &mut items);
        let note_column = items
            .iter()
            .map(|i| i.first_column().chars().count())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = items.iter().map(|i| i.format(note_column)).collect();
        lines.join("\n")
    }
}
