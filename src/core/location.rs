//! Pulls a geocodable location out of free text.
//!
//! Rules run in order and the first one that produces a value wins:
//! decimal coordinates anywhere in the text, then an `in <Place>[, <Region>]`
//! phrase near the start of the text.

use once_cell::sync::Lazy;
use regex::Regex;

/// Only the opening of a text is scanned for place phrases.
pub const PHRASE_WINDOW_CHARS: usize = 600;

static COORDINATES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?[0-9]{1,3}\.[0-9]+)\s*,\s*(-?[0-9]{1,3}\.[0-9]+)")
        .expect("coordinate pattern is valid")
});

static PLACE_PHRASE: Lazy<Regex> = Lazy::new(|| {
    let name = r"[A-Z][A-Za-zÀ-ÿ'\-]+(?:\s+[A-Z][A-Za-zÀ-ÿ'\-]+)*";
    Regex::new(&format!(r"\bin\s+({name})(?:,\s*({name}))?"))
        .expect("place phrase pattern is valid")
});

type Rule = fn(&str) -> Option<String>;

const RULES: &[Rule] = &[coordinates, place_phrase];

/// Returns the best location hint in `text`, or `None` if no rule matches.
pub fn extract_location(text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    RULES.iter().find_map(|rule| rule(text))
}

/// First `lat, lng` pair in the text, if it is in range.
///
/// Only the first pair is considered; an out-of-range first pair hands over
/// to the next rule.
fn coordinates(text: &str) -> Option<String> {
    let caps = COORDINATES.captures(text)?;
    let lat: f64 = caps[1].parse().ok()?;
    let lng: f64 = caps[2].parse().ok()?;

    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
        Some(format!("{},{}", format_degrees(lat), format_degrees(lng)))
    } else {
        None
    }
}

fn place_phrase(text: &str) -> Option<String> {
    let caps = PLACE_PHRASE.captures(phrase_window(text))?;
    let place = caps.get(1)?.as_str();

    match caps.get(2) {
        Some(region) => Some(format!("{}, {}", place, region.as_str())),
        None => Some(place.to_string()),
    }
}

fn phrase_window(text: &str) -> &str {
    match text.char_indices().nth(PHRASE_WINDOW_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Decimal-degree text: whole numbers keep a trailing ".0" and magnitudes
/// below 1e-4 switch to a two-digit exponent (`1e-05`, `-2.5e-07`).
fn format_degrees(value: f64) -> String {
    if value != 0.0 {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Some(exponent) = exponent.parse::<i32>().ok().filter(|e| *e < -4) {
                return format!("{}e-{:02}", mantissa, -exponent);
            }
        }
    }

    let formatted = value.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}
