//! Table scanning shared by the vendor extractors.
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::warn;

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("row selector is valid"));
static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("cell selector is valid"));
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[\d.,]*$").expect("numeric pattern is valid"));

/// Text of one `<tr>`: the whole row and each `<td>`, whitespace-stripped.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub text: String,
    pub cells: Vec<String>,
}

impl TableRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Every table row in the page, in document order.
pub fn table_rows(html: &str) -> Vec<TableRow> {
    let document = Html::parse_document(html);
    document
        .select(&ROW)
        .map(|row| TableRow {
            text: stripped_text(row),
            cells: row.select(&CELL).map(stripped_text).collect(),
        })
        .collect()
}

/// Case-insensitive check that `text` contains every needle.
pub fn contains_all(text: &str, needles: &[&str]) -> bool {
    let haystack = text.to_uppercase();
    needles
        .iter()
        .all(|needle| haystack.contains(&needle.to_uppercase()))
}

/// Whether a cell looks like a bare number such as `16.050` or `2,150,000`.
pub fn is_numeric_cell(text: &str) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    NUMERIC.is_match(&compact)
}

/// Parses a loosely formatted price by dropping every non-digit.
///
/// `"15.550.000"`, `"15,550,000"` and `"15550000"` all give 15550000.
/// Input with no digits, or too many to fit, gives 0 and a warning.
pub fn parse_price(raw: &str) -> f64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<f64>() {
        Ok(price) if price.is_finite() => price,
        _ => {
            warn!("Could not parse price: {:?}", raw);
            0.0
        }
    }
}
