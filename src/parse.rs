//! Best-effort parsing of user supplied colors.

use log::debug;
use rgb::RGB8;
use crate::color::Color;
use crate::error::{Error, Result};

/// Parse the arguments of `lab(L, a, b)` or a bare `L, a, b` triple.
/// Components may be separated by commas and/or spaces.
fn lab_triple(args: &str) -> Option<Color> {
    let nums: Vec<f64> = args.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::parse::<f64>)
        .collect::<std::result::Result<_, _>>().ok()?;
    match nums[..] {
        [l, a, b] => Color::lab(l, a, b).ok(),
        _ => None,
    }
}

fn bare_hex(s: &str) -> Option<Color> {
    if s.len() == 6 && s.bytes().all(|c| c.is_ascii_hexdigit()) {
        Color::from_hex(s).ok()
    } else {
        None
    }
}

fn css(s: &str) -> Option<Color> {
    let [r, g, b, _] = csscolorparser::parse(s).ok()?.to_rgba8();
    Some(Color::from_display(RGB8 { r, g, b }))
}

/// Parse `text` as a color, returning the reason on failure.
///
/// Recognized, in order: `lab(L, a, b)`, three comma separated numbers
/// (taken as L, a, b), six hex digits without `#`, then any CSS color
/// (hex with `#`, `rgb()`, `hsl()`, named colors, …).
pub fn parse_strict(text: &str) -> Result<Color> {
    let s = text.trim();
    let lower = s.to_ascii_lowercase();
    let found = if let Some(args) = lower.strip_prefix("lab(")
        .and_then(|x| x.strip_suffix(')')) {
        lab_triple(args)
    } else if s.contains(',') && !s.contains('(') {
        lab_triple(s)
    } else {
        bare_hex(s).or_else(|| css(s))
    };
    found.ok_or_else(|| Error::Parse(s.to_string()))
}

/// Parse `text` as a color.  Never panics; returns `None` when the text
/// is not recognized.
pub fn parse(text: &str) -> Option<Color> {
    match parse_strict(text) {
        Ok(c) => Some(c),
        Err(e) => { debug!("{e}"); None }
    }
}

/// Outcome of parsing a list of colors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseReport {
    /// Successfully parsed colors, in input order.
    pub colors: Vec<Color>,
    /// The fragments that could not be parsed.
    pub rejected: Vec<String>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool { self.rejected.is_empty() }
}

/// Parse several colors separated by newlines or `;`.  A fragment that
/// does not parse as a whole is split further on whitespace.
pub fn parse_many(text: &str) -> ParseReport {
    let mut report = ParseReport::default();
    for frag in text.split(['\n', ';']).map(str::trim)
        .filter(|f| !f.is_empty()) {
        if let Some(c) = parse(frag) {
            report.colors.push(c);
            continue
        }
        for tok in frag.split_whitespace() {
            match parse(tok) {
                Some(c) => report.colors.push(c),
                None => report.rejected.push(tok.to_string()),
            }
        }
    }
    report
}
