//! Quality-weighted culture negotiation.
//!
//! # Responsibilities
//! - Parse Accept-Language style values into weighted candidates
//! - Match candidates against a domain's whitelisted cultures
//!
//! # Design Decisions
//! - Weights kept as integer thousandths so ordering is exact
//! - Stable sort: equal weights keep request order
//! - A language-only candidate ("fr") may match a regional entry ("fr-CA");
//!   the first such entry in whitelist order wins
//! - Unparseable pieces are skipped, never reported

use std::cmp::Reverse;

/// Highest weight, `q=1`.
const MAX_QUALITY: u16 = 1000;

/// Wildcard candidate, accepts any culture.
const WILDCARD: &str = "*";

/// Separators between a culture's language and region subtags.
const SEPARATORS: [char; 2] = ['-', '_'];

/// One weighted entry of an Accept-Language value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub tag: &'a str,
    /// Weight in thousandths, `1..=1000`.
    pub quality: u16,
}

impl Candidate<'_> {
    pub fn is_wildcard(&self) -> bool {
        self.tag == WILDCARD
    }
}

/// Primary subtag of a culture: everything before the first separator.
pub fn language_of(culture: &str) -> &str {
    culture
        .split(SEPARATORS)
        .next()
        .unwrap_or(culture)
}

/// Parse an Accept-Language style value, most preferred first.
///
/// Entries with `q=0` or an unparseable weight are dropped.
pub fn parse_candidates(raw: &str) -> Vec<Candidate<'_>> {
    let mut candidates: Vec<Candidate<'_>> = raw
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }

            let mut quality = MAX_QUALITY;
            for param in parts {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = parse_quality(value.trim())?;
                }
            }

            (quality > 0).then_some(Candidate { tag, quality })
        })
        .collect();

    candidates.sort_by_key(|c| Reverse(c.quality));
    candidates
}

/// Parse a `q` value (`0` to `1`, at most three decimals) into thousandths.
fn parse_quality(value: &str) -> Option<u16> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if fraction.len() > 3 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let fraction = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<3}").parse::<u16>().ok()?
    };

    let thousandths = match whole {
        "0" => fraction,
        "1" if fraction == 0 => MAX_QUALITY,
        _ => return None,
    };
    Some(thousandths)
}

/// Pick the best whitelisted culture for a raw Accept-Language style value.
///
/// `cultures` must lead with the domain default; it is what `*` selects.
/// Returns the whitelist's own spelling of the match.
pub fn negotiate<'c>(raw: &str, cultures: &'c [String]) -> Option<&'c str> {
    parse_candidates(raw)
        .iter()
        .find_map(|candidate| match_candidate(candidate, cultures))
}

fn match_candidate<'c>(candidate: &Candidate<'_>, cultures: &'c [String]) -> Option<&'c str> {
    if candidate.is_wildcard() {
        return cultures.first().map(String::as_str);
    }

    let exact = cultures
        .iter()
        .find(|c| c.eq_ignore_ascii_case(candidate.tag));
    if let Some(culture) = exact {
        return Some(culture.as_str());
    }

    if candidate.tag.contains(SEPARATORS) {
        return None;
    }

    cultures
        .iter()
        .find(|c| language_of(c).eq_ignore_ascii_case(candidate.tag))
        .map(String::as_str)
}
