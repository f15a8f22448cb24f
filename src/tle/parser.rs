//! TLE parsing utilities

use crate::tle::types::SatelliteRecord;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Records parsed from a TLE text body plus the number of blocks that were dropped
#[derive(Debug, Default)]
pub struct ParsedTle {
    pub records: Vec<SatelliteRecord>,
    pub rejected: usize,
}

/// Parse TLE epoch from line 1 to UTC DateTime
pub fn parse_tle_epoch_to_utc(line1: &str) -> Option<DateTime<Utc>> {
    // TLE line1 epoch fields (columns 19–32, 1-based; 18..32 0-based)
    let field = line1.get(18..32)?.trim();
    let (yyddd, frac) = field.split_once('.').unwrap_or((field, "0"));
    if yyddd.len() != 5 {
        return None;
    }
    let (yy_str, ddd_str) = yyddd.split_at(2);
    let yy: i32 = yy_str.parse().ok()?;
    let ddd: i64 = ddd_str.parse().ok()?;
    if !(1..=366).contains(&ddd) {
        return None;
    }
    let year = if yy >= 57 { 1900 + yy } else { 2000 + yy };
    let day_fraction: f64 = format!("0.{}", frac).parse().ok()?;
    let nanos = (day_fraction * 86_400.0 * 1e9).round() as i64;

    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)?
        .checked_add_signed(Duration::days(ddd - 1))?
        .and_hms_opt(0, 0, 0)?;
    Some((midnight + Duration::nanoseconds(nanos)).and_utc())
}

/// Strip BOM, CR and padding from a raw body line
fn clean_line(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\u{feff}' || c == '\r' || c == '\n' || c == ' ')
}

/// NORAD catalog number, columns 3-7 of either element line
fn catalog_number(line: &str) -> Option<u32> {
    line.get(2..7).and_then(|s| s.trim().parse::<u32>().ok())
}

fn is_element_line(line: &str) -> bool {
    line.starts_with("1 ") || line.starts_with("2 ")
}

/// Parse a 2LE/3LE text body (as served by Celestrak with FORMAT=tle) into records
///
/// A name line directly before line 1 is attached to the record; the `"0 "`
/// prefix used by some 3LE sources is dropped. Pairs whose epoch or NORAD
/// number cannot be read, or whose two lines name different satellites, are
/// counted in `rejected`.
pub fn parse_tle_catalog(body: &str) -> ParsedTle {
    let lines: Vec<&str> = body
        .lines()
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    let mut parsed = ParsedTle::default();
    let mut i = 0;
    while i < lines.len() {
        if i + 1 < lines.len() && lines[i].starts_with("1 ") && lines[i + 1].starts_with("2 ") {
            let line1 = lines[i];
            let line2 = lines[i + 1];

            let name = if i > 0 && !is_element_line(lines[i - 1]) {
                let raw = lines[i - 1];
                Some(raw.strip_prefix("0 ").unwrap_or(raw).trim().to_string())
            } else {
                None
            };

            let norad = catalog_number(line1);
            let norad = norad.filter(|n| catalog_number(line2) == Some(*n));
            match (norad, parse_tle_epoch_to_utc(line1)) {
                (Some(norad), Some(epoch_utc)) => parsed.records.push(SatelliteRecord {
                    norad,
                    name,
                    line1: line1.to_string(),
                    line2: line2.to_string(),
                    epoch_utc,
                }),
                _ => {
                    tracing::debug!(
                        "rejecting TLE block {:?}: unreadable or mismatched NORAD id, or bad epoch",
                        name
                    );
                    parsed.rejected += 1;
                }
            }
            i += 2;
        } else {
            if lines[i].starts_with("1 ") {
                // line 1 without its partner
                parsed.rejected += 1;
            }
            i += 1;
        }
    }
    parsed
}
