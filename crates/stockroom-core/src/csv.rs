//! # Product CSV Codec
//!
//! Converts the catalog to and from the spreadsheet-friendly CSV layout the
//! shop staff exchange with suppliers.
//!
//! ## File Layout
//! ```text
//! Código,Descripción,EAN Principal,EAN Secundario,Fecha Creación,Última Actualización
//! "ABC-1","Widget, large","4006381333931","","5/3/2024, 9:30:00","5/3/2024, 9:30:00"
//! "ABC-2","Gadget","1234567890128","5901234123457","6/3/2024, 14:02:11","7/3/2024, 8:00:00"
//! ```
//!
//! - Header cells are bare, data cells are always double-quoted
//! - Rows are joined with `\n` (no trailing newline)
//! - Dates use the day-first `d/m/yyyy, H:MM:SS` form in the caller's zone
//!
//! ## Import Tokenizer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  At each position, in order:                                            │
//! │                                                                         │
//! │  1. Quoted span   "..."   shortest span whose closing quote is          │
//! │                           followed by blanks, then ',' or end of line   │
//! │  2. Bare run      abc     every character up to the next ','            │
//! │  3. Comma         ,       skipped (an empty bare cell yields nothing)   │
//! │                                                                         │
//! │  Each token: drop one leading and one trailing '"', then trim.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because empty bare cells produce no token, a row like `A,,123` shifts its
//! columns left. Exports always quote every cell, so files produced by
//! [`export_products`] are not affected.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::types::{Product, ProductInput};

/// Header row of every exported file.
pub const CSV_HEADER: [&str; 6] = [
    "Código",
    "Descripción",
    "EAN Principal",
    "EAN Secundario",
    "Fecha Creación",
    "Última Actualización",
];

/// Day-first date-time layout used in exported cells.
const DATE_FORMAT: &str = "%-d/%-m/%Y, %-H:%M:%S";

// =============================================================================
// Export
// =============================================================================

/// Renders `products` as CSV text, dates shown in `tz`.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stockroom_core::csv::export_products;
///
/// let csv = export_products(&[], &Utc);
/// assert!(csv.starts_with("Código,Descripción"));
/// ```
pub fn export_products<Tz>(products: &[Product], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::with_capacity(products.len() + 1);
    lines.push(CSV_HEADER.join(","));

    for product in products {
        let cells = [
            product.code.clone(),
            product.description.clone(),
            product.ean_primary.clone(),
            product.ean_secondary.clone(),
            format_timestamp(&product.created_at, tz),
            format_timestamp(&product.updated_at, tz),
        ];
        let row: Vec<String> = cells.iter().map(|cell| format!("\"{cell}\"")).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// An export containing a single example product, for users to fill in.
pub fn template_csv<Tz>(tz: &Tz, now: DateTime<Utc>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let example = Product {
        id: String::new(),
        code: "EJEMPLO-001".to_string(),
        description: "Producto de ejemplo".to_string(),
        ean_primary: "1234567890128".to_string(),
        ean_secondary: String::new(),
        created_at: now,
        updated_at: now,
    };
    export_products(&[example], tz)
}

/// Download name for an export made on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("productos_{}.csv", date.format("%Y-%m-%d"))
}

fn format_timestamp<Tz>(at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz).format(DATE_FORMAT).to_string()
}

// =============================================================================
// Import
// =============================================================================

/// Parses CSV text into product payloads.
///
/// The first non-blank line is treated as a header and skipped. Columns
/// 0..=3 map to code, description, primary EAN and secondary EAN; anything
/// after is ignored. Rows without a code or a primary EAN are dropped.
/// Barcodes are NOT validated here.
///
/// ## Example
/// ```rust
/// use stockroom_core::csv::parse_csv;
///
/// let rows = parse_csv("Código,Descripción,EAN\n\"A-1\",\"Thing\",\"4006381333931\"");
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].code, "A-1");
/// assert!(parse_csv("Código,Descripción").is_empty());
/// ```
pub fn parse_csv(text: &str) -> Vec<ProductInput> {
    let lines: Vec<&str> = text.split('\n').filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    lines[1..]
        .iter()
        .map(|line| {
            let mut fields = tokenize(line).into_iter();
            ProductInput {
                code: fields.next().unwrap_or_default(),
                description: fields.next().unwrap_or_default(),
                ean_primary: fields.next().unwrap_or_default(),
                ean_secondary: fields.next().unwrap_or_default(),
            }
        })
        .filter(|input| !input.code.is_empty() && !input.ean_primary.is_empty())
        .collect()
}

/// Splits one line into cleaned field values.
fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if let Some(end) = quoted_span_end(&chars, pos) {
            fields.push(clean_field(&chars[pos..end]));
            pos = end;
        } else if chars[pos] != ',' {
            let end = chars[pos..]
                .iter()
                .position(|&c| c == ',')
                .map_or(chars.len(), |offset| pos + offset);
            fields.push(clean_field(&chars[pos..end]));
            pos = end;
        } else {
            pos += 1;
        }
    }

    fields
}

/// End (exclusive) of the shortest quoted span starting at `start` that is
/// followed by a field boundary.
fn quoted_span_end(chars: &[char], start: usize) -> Option<usize> {
    if chars[start] != '"' {
        return None;
    }

    for (i, &c) in chars.iter().enumerate().skip(start + 1) {
        if is_line_break(c) {
            return None;
        }
        if c == '"' && at_field_boundary(chars, i + 1) {
            return Some(i + 1);
        }
    }

    None
}

/// True when only blanks separate `pos` from a comma or the end of the line.
fn at_field_boundary(chars: &[char], pos: usize) -> bool {
    let mut i = pos;
    while i < chars.len() && is_blank(chars[i]) {
        i += 1;
    }
    i == chars.len() || chars[i] == ','
}

fn clean_field(token: &[char]) -> String {
    let mut token = token;
    if token.first() == Some(&'"') {
        token = &token[1..];
    }
    if token.last() == Some(&'"') {
        token = &token[..token.len() - 1];
    }
    token.iter().collect::<String>().trim().to_string()
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\r' | '\u{2028}' | '\u{2029}')
}

// =============================================================================
// Unit Tests
// =============================================================================
