use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::fmt;

pub const DEFAULT_DATE_FORMAT: &str = "ddd, DD MMM YYYY HH:mm:ss";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Strftime(&'static str),
    Ordinal,
    MinWeekday,
    Quarter,
    UnixMillis,
    Fraction(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(Field),
}

// Longest tokens first so `MMMM` wins over `MM` and `M`.
const TOKENS: &[(&str, Field)] = &[
    ("YYYY", Field::Strftime("%Y")),
    ("MMMM", Field::Strftime("%B")),
    ("DDDD", Field::Strftime("%j")),
    ("dddd", Field::Strftime("%A")),
    ("MMM", Field::Strftime("%b")),
    ("DDD", Field::Strftime("%-j")),
    ("ddd", Field::Strftime("%a")),
    ("SSS", Field::Fraction(3)),
    ("YY", Field::Strftime("%y")),
    ("MM", Field::Strftime("%m")),
    ("DD", Field::Strftime("%d")),
    ("Do", Field::Ordinal),
    ("dd", Field::MinWeekday),
    ("HH", Field::Strftime("%H")),
    ("hh", Field::Strftime("%I")),
    ("mm", Field::Strftime("%M")),
    ("ss", Field::Strftime("%S")),
    ("SS", Field::Fraction(2)),
    ("ZZ", Field::Strftime("%z")),
    ("Q", Field::Quarter),
    ("M", Field::Strftime("%-m")),
    ("D", Field::Strftime("%-d")),
    ("d", Field::Strftime("%w")),
    ("H", Field::Strftime("%-H")),
    ("h", Field::Strftime("%-I")),
    ("m", Field::Strftime("%-M")),
    ("s", Field::Strftime("%-S")),
    ("S", Field::Fraction(1)),
    ("A", Field::Strftime("%p")),
    ("a", Field::Strftime("%P")),
    ("Z", Field::Strftime("%:z")),
    ("X", Field::Strftime("%s")),
    ("x", Field::UnixMillis),
];

/// A moment-style timestamp pattern such as `ddd, DD MMM YYYY HH:mm:ss`.
///
/// Recognised tokens are rendered through chrono; text inside `[...]` and any
/// character that is not part of a token is copied as-is.
#[derive(Debug, Clone)]
pub struct DateFormat {
    pattern: String,
    pieces: Vec<Piece>,
}

impl DateFormat {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            pieces: parse(pattern),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn render<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let mut rendered = String::with_capacity(self.pattern.len() + 8);

        for piece in &self.pieces {
            let field = match piece {
                Piece::Literal(text) => {
                    rendered.push_str(text);
                    continue;
                }
                Piece::Field(field) => field,
            };

            match field {
                Field::Strftime(directive) => rendered.push_str(&at.format(directive).to_string()),
                Field::Ordinal => rendered.push_str(&ordinal(at.day())),
                Field::MinWeekday => {
                    let weekday = at.format("%a").to_string();
                    rendered.push_str(&weekday[..2]);
                }
                Field::Quarter => rendered.push_str(&(at.month0() / 3 + 1).to_string()),
                Field::UnixMillis => rendered.push_str(&at.timestamp_millis().to_string()),
                Field::Fraction(digits) => {
                    let nanos = at.nanosecond() % 1_000_000_000;
                    let value = nanos / 10u32.pow(9 - digits);
                    rendered.push_str(&format!("{:0width$}", value, width = *digits as usize));
                }
            }
        }

        rendered
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::new(DEFAULT_DATE_FORMAT)
    }
}

impl PartialEq for DateFormat {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for DateFormat {}

impl PartialEq<&str> for DateFormat {
    fn eq(&self, other: &&str) -> bool {
        self.pattern == *other
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

impl From<&str> for DateFormat {
    fn from(pattern: &str) -> Self {
        DateFormat::new(pattern)
    }
}

fn parse(pattern: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(first) = rest.chars().next() {
        if first == '[' {
            if let Some(end) = rest.find(']') {
                literal.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((token, field)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Field(*field));
            rest = &rest[token.len()..];
            continue;
        }

        literal.push(first);
        rest = &rest[first.len_utf8()..];
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }

    pieces
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 2, 14, 5, 9).unwrap() + chrono::Duration::milliseconds(42)
    }

    #[test]
    fn renders_the_default_pattern() {
        let format = DateFormat::default();

        assert_eq!(format.as_str(), DEFAULT_DATE_FORMAT);
        assert_eq!(format.render(&sample()), "Sat, 02 Mar 2024 14:05:09");
    }

    #[test]
    fn renders_short_and_padded_tokens() {
        assert_eq!(DateFormat::new("DD-MM-YYYY").render(&sample()), "02-03-2024");
        assert_eq!(DateFormat::new("D/M/YY").render(&sample()), "2/3/24");
        assert_eq!(DateFormat::new("h:mm A").render(&sample()), "2:05 PM");
        assert_eq!(DateFormat::new("hh a").render(&sample()), "02 pm");
        assert_eq!(DateFormat::new("HH:mm:ss.SSS").render(&sample()), "14:05:09.042");
        assert_eq!(DateFormat::new("dddd, MMMM Do").render(&sample()), "Saturday, March 2nd");
        assert_eq!(DateFormat::new("dd Q").render(&sample()), "Sa 1");
    }

    #[test]
    fn escaped_text_is_literal() {
        let format = DateFormat::new("[Today is] dddd [at] HH");

        assert_eq!(format.render(&sample()), "Today is Saturday at 14");
    }

    #[test]
    fn unmatched_bracket_and_percent_stay_literal() {
        assert_eq!(DateFormat::new("[YYYY").render(&sample()), "[2024");
        assert_eq!(DateFormat::new("100% YYYY").render(&sample()), "100% 2024");
    }

    #[test]
    fn renders_offsets_for_other_zones() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let at = sample().with_timezone(&offset);

        assert_eq!(DateFormat::new("HH:mm Z").render(&at), "16:05 +02:00");
        assert_eq!(DateFormat::new("ZZ").render(&at), "+0200");
    }

    #[test]
    fn unix_timestamps() {
        let at = sample();

        assert_eq!(DateFormat::new("X").render(&at), at.timestamp().to_string());
        assert_eq!(DateFormat::new("x").render(&at), at.timestamp_millis().to_string());
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(23), "23rd");
        assert_eq!(ordinal(13), "13th");
    }
}
