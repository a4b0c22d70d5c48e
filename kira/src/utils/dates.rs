//! Strict date parsing against letter-style formats (`Y-m-d H:i:s`).

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::NaiveDateTime;

use crate::errors::{KiraError, Result};

/// A date format translated into a chrono pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    pattern: String,
}

impl DateFormat {
    /// Translates a letter-style format.
    ///
    /// Supported letters: `Y y m n d j H G h g i s A a`. A backslash escapes
    /// the next character; every other non-letter is copied literally.
    pub fn parse(format: &str) -> Result<Self> {
        let mut pattern = String::new();
        let mut has_date = false;
        let mut has_time = false;
        let mut chars = format.chars();
        while let Some(ch) = chars.next() {
            let piece = match ch {
                'Y' => "%Y",
                'y' => "%y",
                'm' => "%m",
                'n' => "%-m",
                'd' => "%d",
                'j' => "%-d",
                'H' => "%H",
                'G' => "%-H",
                'h' => "%I",
                'g' => "%-I",
                'i' => "%M",
                's' => "%S",
                'A' => "%p",
                'a' => "%P",
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        push_literal(&mut pattern, escaped);
                    }
                    continue;
                }
                '%' => "%%",
                c if c.is_ascii_alphabetic() => {
                    return Err(KiraError::invalid_settings(
                        "date",
                        format!("format letter '{c}' is not supported in '{format}'"),
                    ));
                }
                c => {
                    push_literal(&mut pattern, c);
                    continue;
                }
            };
            match ch {
                'Y' | 'y' | 'm' | 'n' | 'd' | 'j' => has_date = true,
                'H' | 'G' | 'h' | 'g' | 'i' | 's' | 'A' | 'a' => has_time = true,
                _ => {}
            }
            pattern.push_str(piece);
        }
        if !has_date && !has_time {
            return Err(KiraError::invalid_settings(
                "date",
                format!("format '{format}' has no date or time fields"),
            ));
        }
        Ok(Self {
            source: format.to_string(),
            pattern,
        })
    }

    /// The format as written in the contract.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The translated chrono pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// True when `input` parses under this format and formatting the parsed
    /// moment gives back exactly `input`.
    ///
    /// The round trip rejects impossible days such as `2012-02-30` as well as
    /// trailing garbage or unpadded fields where padding is expected.
    #[must_use]
    pub fn matches(&self, input: &str) -> bool {
        self.reformat(input).is_some_and(|formatted| formatted == input)
    }

    /// Fields the format leaves out take their lowest value (January, day 1,
    /// midnight), so partial formats such as `Y-m` or `H` still resolve.
    fn reformat(&self, input: &str) -> Option<String> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, input, StrftimeItems::new(&self.pattern)).ok()?;
        fill_missing(&mut parsed).ok()?;
        let date = parsed.to_naive_date().ok()?;
        let time = parsed.to_naive_time().ok()?;
        Some(NaiveDateTime::new(date, time).format(&self.pattern).to_string())
    }
}

fn fill_missing(parsed: &mut Parsed) -> ParseResult<()> {
    if parsed.year().is_none() && parsed.year_mod_100().is_none() {
        parsed.set_year(1970)?;
    }
    if parsed.month().is_none() {
        parsed.set_month(1)?;
    }
    if parsed.day().is_none() {
        parsed.set_day(1)?;
    }
    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0)?,
        (None, Some(_)) => parsed.set_ampm(false)?,
        (Some(_), None) => parsed.set_hour12(12)?,
        (Some(_), Some(_)) => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

fn push_literal(pattern: &mut String, ch: char) {
    if ch == '%' {
        pattern.push_str("%%");
    } else {
        pattern.push(ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_default_format() {
        let f = DateFormat::parse("Y-m-d H:i:s").unwrap();
        assert_eq!(f.pattern(), "%Y-%m-%d %H:%M:%S");
        assert_eq!(f.source(), "Y-m-d H:i:s");
    }

    #[test]
    fn test_date_only_round_trip() {
        let f = DateFormat::parse("Y-m-d").unwrap();
        assert!(f.matches("2012-02-28"));
        assert!(f.matches("2012-02-29"));
        assert!(!f.matches("2012-02-30"));
        assert!(!f.matches("2013-02-29"));
        assert!(!f.matches("2012-2-28"));
        assert!(!f.matches("2012-02-28 junk"));
        assert!(!f.matches("28.02.2012"));
    }

    #[test]
    fn test_datetime_round_trip() {
        let f = DateFormat::parse("Y-m-d H:i:s").unwrap();
        assert!(f.matches("2020-01-31 23:59:59"));
        assert!(!f.matches("2020-01-31 24:00:00"));
        assert!(!f.matches("2020-01-31"));
    }

    #[test]
    fn test_time_only_and_escapes() {
        let f = DateFormat::parse("H:i").unwrap();
        assert!(f.matches("07:30"));
        assert!(!f.matches("7:30"));

        let escaped = DateFormat::parse(r"d.m.Y \a\t H:i").unwrap();
        assert_eq!(escaped.pattern(), "%d.%m.%Y at %H:%M");
        assert!(escaped.matches("01.02.2003 at 04:05"));
    }

    #[test]
    fn test_partial_formats() {
        let month = DateFormat::parse("Y-m").unwrap();
        assert!(month.matches("2012-02"));
        assert!(!month.matches("2012-13"));
        assert!(!month.matches("2012-02-01"));

        let short = DateFormat::parse("m/y").unwrap();
        assert!(short.matches("02/27"));
        assert!(!short.matches("2/27"));

        let hour = DateFormat::parse("d.m.Y H").unwrap();
        assert!(hour.matches("01.02.2003 04"));
        assert!(!hour.matches("30.02.2003 04"));

        let twelve = DateFormat::parse("h:i").unwrap();
        assert!(twelve.matches("12:30"));
        assert!(twelve.matches("07:05"));
    }

    #[test]
    fn test_unsupported_letters() {
        assert!(DateFormat::parse("Y-m-d D").is_err());
        assert!(DateFormat::parse("---").is_err());
    }
}
