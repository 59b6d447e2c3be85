//! `.properties` file reader.
//!
//! # Format
//! ```text
//! # comment            ! also a comment
//! key=value            key: value            key value
//! multi=first \
//!       second         (continuation, leading blanks dropped)
//! unicode=caf\u00e9    tab=a\tb              literal=\=\:\ \#
//! ```
//!
//! Files are decoded as UTF-8, falling back to ISO-8859-1 for legacy files.
//! When a key repeats, the last value wins.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

/// Error raised while reading or parsing a property file.
#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed \\u escape on line {line}: \\u{escape}")]
    MalformedUnicodeEscape { line: usize, escape: String },
}

/// Parsed key/value pairs of a property file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Read and parse the file at `path`.
    ///
    /// The handle is dropped before parsing starts, whether or not the
    /// read succeeded.
    pub fn read(path: &Path) -> Result<Self, PropertiesError> {
        let bytes = {
            let mut file = File::open(path)?;
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes)?;
            bytes
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => e.into_bytes().iter().map(|&b| char::from(b)).collect(),
        };

        content.parse()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::str::FromStr for Properties {
    type Err = PropertiesError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut entries = HashMap::new();
        for (line_no, line) in logical_lines(input) {
            let (raw_key, raw_value) = split_key_value(&line);
            let key = unescape(raw_key, line_no)?;
            let value = unescape(raw_value, line_no)?;
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Joins continuation lines and drops comments and blank lines.
/// Each logical line carries the number of the physical line it started on.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, physical) in input.lines().enumerate() {
        let trimmed = physical.trim_start_matches(is_blank);

        let (line_no, mut buf) = match pending.take() {
            Some(pending) => pending,
            None => {
                if trimmed.is_empty() || trimmed.starts_with(['#', '!']) {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        let trailing_backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
        if trailing_backslashes % 2 == 1 {
            buf.push_str(&trimmed[..trimmed.len() - 1]);
            pending = Some((line_no, buf));
        } else {
            buf.push_str(trimmed);
            lines.push((line_no, buf));
        }
    }

    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

/// Splits a logical line at the first unescaped `=`, `:` or blank.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut separator = None;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                separator = Some((idx, c));
                break;
            }
            c if is_blank(c) => {
                separator = Some((idx, c));
                break;
            }
            _ => {}
        }
    }

    let Some((idx, sep)) = separator else {
        return (line, "");
    };

    let key = &line[..idx];
    let mut value = line[idx + sep.len_utf8()..].trim_start_matches(is_blank);
    if is_blank(sep) {
        if let Some(rest) = value.strip_prefix(['=', ':']) {
            value = rest.trim_start_matches(is_blank);
        }
    }
    (key, value)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_unicode_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: the low half must follow as another \u escape.
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_unicode_unit(&mut chars, line)?,
                        _ => return Err(malformed(line, format!("{unit:04x}"))),
                    };
                    char::decode_utf16([unit, low])
                        .next()
                        .and_then(Result::ok)
                        .ok_or_else(|| malformed(line, format!("{unit:04x}")))?
                } else {
                    char::from_u32(u32::from(unit))
                        .ok_or_else(|| malformed(line, format!("{unit:04x}")))?
                };
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_unicode_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16, PropertiesError> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed(line, hex));
    }
    u16::from_str_radix(&hex, 16).map_err(|_| malformed(line, hex))
}

fn malformed(line: usize, escape: String) -> PropertiesError {
    PropertiesError::MalformedUnicodeEscape { line, escape }
}
