//! Day range strings such as `"1-4, 12-17, 20"`.
//!
//! Gig forms persist a selected set of days in this compact form. Runs of
//! consecutive days collapse into `start-end`, single days stay bare and
//! runs are joined with `", "` in ascending order.

use itertools::Itertools;
use nom::{
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map, map_res, verify},
    sequence::{delimited, separated_pair},
    IResult,
};
use serde_with::DeserializeFromStr;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};
use crate::highlight::HighlightSet;

/// What to do with tokens that are neither a day nor a valid `start-end` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeserializeFromStr)]
pub enum ParsePolicy {
    /// Skip them and keep the valid part.
    Lenient,
    /// Fail and report them.
    Strict,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        ParsePolicy::Lenient
    }
}

impl FromStr for ParsePolicy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lenient" => Ok(ParsePolicy::Lenient),
            "strict" => Ok(ParsePolicy::Strict),
            _ => Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("Parse policy '{}' not recognized", s),
            )),
        }
    }
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePolicy::Lenient => write!(f, "lenient"),
            ParsePolicy::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Day(u32),
    Run(u32, u32),
}

// Days are 1-based, so `0` never parses.
fn day_number(input: &str) -> IResult<&str, u32> {
    verify(map_res(digit1, u32::from_str), |day: &u32| *day > 0)(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map(
            separated_pair(day_number, delimited(space0, char('-'), space0), day_number),
            |(start, end)| Token::Run(start, end),
        ),
        map(day_number, Token::Day),
    ))(input)
}

fn parse_token(input: &str) -> Result<Token> {
    let (_, token) = all_consuming(token)(input)?;
    Ok(token)
}

/// Outcome of parsing a range string: the days found and every token that
/// had to be dropped, verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub days: HighlightSet,
    pub rejected: Vec<String>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn into_result(self) -> Result<HighlightSet> {
        if self.is_clean() {
            Ok(self.days)
        } else {
            Err(Error::from(ErrorKind::MalformedRange(self.rejected)))
        }
    }
}

/// Collapses `days` into a range string. Duplicates are ignored.
pub fn serialize<I: IntoIterator<Item = u32>>(days: I) -> String {
    days.into_iter()
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .map(|day| (day, day))
        .coalesce(|(start, end), (next_start, next_end)| {
            if end + 1 == next_start {
                Ok((start, next_end))
            } else {
                Err(((start, end), (next_start, next_end)))
            }
        })
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .join(", ")
}

pub fn parse_report(s: &str) -> ParseReport {
    parse_report_within(s, u32::MAX)
}

/// Like [`parse_report`], but no day beyond `max_day` is ever expanded.
///
/// A run reaching past `max_day` keeps its part up to `max_day` and is
/// still reported as rejected; a single day past it is rejected.
pub fn parse_report_within(s: &str, max_day: u32) -> ParseReport {
    let mut report = ParseReport::default();

    for raw in s.split(',').map(str::trim).filter(|raw| !raw.is_empty()) {
        match parse_token(raw) {
            Ok(Token::Day(day)) if day <= max_day => {
                report.days.insert(day);
            }
            Ok(Token::Day(day)) => {
                log::debug!("Day '{}' is past the last day {}", day, max_day);
                report.rejected.push(raw.to_owned());
            }
            Ok(Token::Run(start, end)) if start <= end => {
                report.days.extend(start..=end.min(max_day));
                if end > max_day {
                    log::debug!("Run '{}' reaches past the last day {}", raw, max_day);
                    report.rejected.push(raw.to_owned());
                }
            }
            Ok(Token::Run(start, end)) => {
                log::debug!("Run '{}' ends before it starts ({} > {})", raw, start, end);
                report.rejected.push(raw.to_owned());
            }
            Err(e) => {
                log::debug!("Token '{}': {}", raw, e);
                report.rejected.push(raw.to_owned());
            }
        }
    }

    report
}

fn into_lenient(report: ParseReport) -> HighlightSet {
    for token in &report.rejected {
        log::warn!("Skipping malformed day range token '{}'", token);
    }
    report.days
}

/// Parses a range string, skipping malformed tokens.
pub fn parse(s: &str) -> HighlightSet {
    into_lenient(parse_report(s))
}

/// Parses a range string, failing if any token is malformed.
pub fn parse_strict(s: &str) -> Result<HighlightSet> {
    parse_report(s).into_result()
}

pub fn parse_with(s: &str, policy: ParsePolicy) -> Result<HighlightSet> {
    match policy {
        ParsePolicy::Lenient => Ok(parse(s)),
        ParsePolicy::Strict => parse_strict(s),
    }
}

/// Parses a range string for a month of `max_day` days.
pub fn parse_with_limit(s: &str, policy: ParsePolicy, max_day: u32) -> Result<HighlightSet> {
    let report = parse_report_within(s, max_day);
    match policy {
        ParsePolicy::Lenient => Ok(into_lenient(report)),
        ParsePolicy::Strict => report.into_result(),
    }
}
