//! Marker color code grammars.
//!
//! A code such as `YG312` is a family letter run followed by a saturation
//! digit and a brightness number. Two grammars exist and are kept apart:
//! the strict one feeds the color wheel, the loose one feeds harmonies.
//! They disagree on long suffixes (`R1234` is loose-only), so callers pick
//! one explicitly.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static STRICT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)([0-9])([0-9]{1,2})$").expect("strict code regex"));

static LOOSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)([0-9]+)$").expect("loose code regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCode {
    pub family: String,
    pub saturation: u8,
    pub brightness: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `FAMILY` + one saturation digit + one or two brightness digits.
    Strict,
    /// `FAMILY` + any digits; first digit is saturation, the rest brightness.
    Loose,
}

pub fn parse(code: &str, grammar: Grammar) -> Option<ParsedCode> {
    match grammar {
        Grammar::Strict => parse_strict(code),
        Grammar::Loose => parse_loose(code),
    }
}

pub fn parse_strict(code: &str) -> Option<ParsedCode> {
    let caps = STRICT_CODE.captures(code)?;
    Some(ParsedCode {
        family: caps[1].to_string(),
        saturation: caps[2].parse().ok()?,
        brightness: caps[3].parse().ok()?,
    })
}

pub fn parse_loose(code: &str) -> Option<ParsedCode> {
    let caps = LOOSE_CODE.captures(code)?;
    let digits = &caps[2];
    let (first, rest) = digits.split_at(1);
    let brightness = if rest.is_empty() { 0 } else { rest.parse().ok()? };
    Some(ParsedCode {
        family: caps[1].to_string(),
        saturation: first.parse().ok()?,
        brightness,
    })
}
