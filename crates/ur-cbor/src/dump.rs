//! Annotated hex dumps.
//!
//! One row per structural element: indented hex on the left, a `# note` on the
//! right. Notes line up at the widest first column, capped at [`NOTE_COLUMN_MAX`].

use crate::encode::{self, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_TAG, MAJOR_TEXT, TAG_EPOCH_DATE};
use crate::tag::TagRegistry;
use crate::value::Value;

const NOTE_COLUMN_MAX: usize = 40;
const INDENT: usize = 3;

struct Row {
    level: usize,
    pieces: Vec<Vec<u8>>,
    note: Option<String>,
}

impl Row {
    fn new(level: usize, pieces: Vec<Vec<u8>>, note: Option<String>) -> Self {
        Self {
            level,
            pieces,
            note,
        }
    }

    /// Header split as first byte, then the extension bytes.
    fn split(level: usize, head: &[u8], note: String) -> Self {
        let (first, rest) = head.split_at(head.len().min(1));
        Self::new(level, vec![first.to_vec(), rest.to_vec()], Some(note))
    }

    fn first_column(&self) -> String {
        let hex: Vec<String> = self
            .pieces
            .iter()
            .filter(|p| !p.is_empty())
            .map(hex::encode)
            .collect();
        format!("{}{}", " ".repeat(self.level * INDENT), hex.join(" "))
    }

    fn format(&self, note_column: usize) -> String {
        let column = self.first_column();
        match &self.note {
            Some(note) => {
                let width = column.chars().count();
                let padding = (note_column.min(NOTE_COLUMN_MAX) + 1)
                    .saturating_sub(width)
                    .max(1);
                format!("{column}{}# {note}", " ".repeat(padding))
            }
            None => column,
        }
    }
}

impl Value {
    /// Multi-line annotated hex listing of the encoded value.
    #[must_use]
    pub fn dump(&self) -> String {
        render(self, None)
    }

    /// Like [`Value::dump`], naming unnamed tags through `registry`.
    #[must_use]
    pub fn dump_with(&self, registry: &TagRegistry) -> String {
        render(self, Some(registry))
    }
}

fn render(value: &Value, registry: Option<&TagRegistry>) -> String {
    let mut rows = Vec::new();
    collect(value, 0, registry, &mut rows);
    let note_column = rows
        .iter()
        .map(|row| row.first_column().chars().count())
        .max()
        .unwrap_or(0);
    rows.iter()
        .map(|row| row.format(note_column))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace control characters with `.`; `None` if nothing printable remains.
fn sanitized(s: &str) -> Option<String> {
    let mut printable = false;
    let out: String = s
        .chars()
        .map(|c| {
            if c.is_ascii() && !(' '..='~').contains(&c) {
                '.'
            } else {
                printable = true;
                c
            }
        })
        .collect();
    printable.then_some(out)
}

fn collect(value: &Value, level: usize, registry: Option<&TagRegistry>, rows: &mut Vec<Row>) {
    match value {
        Value::Unsigned(n) => rows.push(Row::new(
            level,
            vec![encode::encode_infallible(value)],
            Some(format!("unsigned({n})")),
        )),
        Value::Negative(n) => rows.push(Row::new(
            level,
            vec![encode::encode_infallible(value)],
            Some(format!("negative({})", -1 - i128::from(*n))),
        )),
        Value::Bytes(b) => {
            rows.push(Row::new(
                level,
                vec![encode::head(MAJOR_BYTES, b.len() as u64)],
                Some(format!("bytes({})", b.len())),
            ));
            if !b.is_empty() {
                let note = std::str::from_utf8(b)
                    .ok()
                    .and_then(sanitized)
                    .map(|s| format!("\"{s}\""));
                rows.push(Row::new(level + 1, vec![b.clone()], note));
            }
        }
        Value::Text(s) => {
            rows.push(Row::split(
                level,
                &encode::head(MAJOR_TEXT, s.len() as u64),
                format!("text({})", s.len()),
            ));
            if !s.is_empty() {
                let shown = sanitized(s).unwrap_or_else(|| ".".repeat(s.chars().count()));
                rows.push(Row::new(
                    level + 1,
                    vec![s.as_bytes().to_vec()],
                    Some(format!("\"{shown}\"")),
                ));
            }
        }
        Value::Array(items) => {
            rows.push(Row::split(
                level,
                &encode::head(MAJOR_ARRAY, items.len() as u64),
                format!("array({})", items.len()),
            ));
            for item in items {
                collect(item, level + 1, registry, rows);
            }
        }
        Value::Map(m) => {
            rows.push(Row::split(
                level,
                &encode::head(MAJOR_MAP, m.len() as u64),
                format!("map({})", m.len()),
            ));
            for (k, v) in m.iter() {
                collect(k, level + 1, registry, rows);
                collect(v, level + 1, registry, rows);
            }
        }
        Value::OrderedMap(m) => {
            rows.push(Row::split(
                level,
                &encode::head(MAJOR_MAP, m.len() as u64),
                format!("map({})", m.len()),
            ));
            for (k, v) in m.iter() {
                collect(k, level + 1, registry, rows);
                collect(v, level + 1, registry, rows);
            }
        }
        Value::Tagged(tag, inner) => {
            let tag = match registry {
                Some(registry) => registry.resolve(tag),
                None => tag.clone(),
            };
            let note = match tag.name() {
                Some(name) => format!("tag({}) {name}", tag.value()),
                None => format!("tag({})", tag.value()),
            };
            rows.push(Row::split(level, &encode::head(MAJOR_TAG, tag.value()), note));
            collect(inner, level + 1, registry, rows);
        }
        Value::Simple(n) => rows.push(Row::new(
            level,
            vec![encode::encode_infallible(value)],
            Some(format!("simple({n})")),
        )),
        Value::Bool(_) | Value::Null | Value::Undefined | Value::Break => rows.push(Row::new(
            level,
            vec![encode::encode_infallible(value)],
            Some(value.diagnostic()),
        )),
        Value::Half(_) | Value::Float(_) | Value::Double(_) => {
            rows.push(Row::split(level, &encode::encode_infallible(value), value.diagnostic()));
        }
        Value::Date(date) => {
            let head = encode::head(MAJOR_TAG, TAG_EPOCH_DATE);
            let mut body = Vec::new();
            encode::write_date_body(date, &mut body);
            let (first, rest) = head.split_at(1);
            rows.push(Row::new(
                level,
                vec![first.to_vec(), rest.to_vec(), body],
                Some(format!("date({date})")),
            ));
        }
    }
}
