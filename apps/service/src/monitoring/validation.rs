//! Well-formedness checks for target list rows.
//!
//! Rows that fail any check are logged and dropped; validation never aborts
//! the whole list.

use anyhow::{Result, anyhow};
use regex::Regex;
use url::Url;

use super::types::Target;

/// Inclusive bounds for a polling interval, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalBounds {
    pub min: u64,
    pub max: u64,
}

impl IntervalBounds {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, seconds: u64) -> bool {
        (self.min..=self.max).contains(&seconds)
    }
}

impl Default for IntervalBounds {
    fn default() -> Self {
        Self::new(5, 300)
    }
}

/// One unvalidated row from the target list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTarget {
    pub url: String,
    pub interval: String,
    pub pattern: Option<String>,
}

impl RawTarget {
    pub fn new(url: impl Into<String>, interval: impl Into<String>, pattern: Option<&str>) -> Self {
        Self {
            url: url.into(),
            interval: interval.into(),
            pattern: pattern.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }
}

/// A URL needs both a scheme and a network location.
///
/// `Url::parse` fills in a missing authority for special schemes
/// (`http:a.com` parses as `http://a.com/`), so the `scheme://authority`
/// shape is checked on the raw string first.
pub fn is_valid_url(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if scheme.is_empty() || authority.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

/// Parse an interval and check it against `bounds`
pub fn parse_interval(interval: &str, bounds: IntervalBounds) -> Option<u64> {
    let seconds: i64 = interval.trim().parse().ok()?;
    u64::try_from(seconds).ok().filter(|s| bounds.contains(*s))
}

pub fn is_valid_interval(interval: &str, bounds: IntervalBounds) -> bool {
    parse_interval(interval, bounds).is_some()
}

/// An absent or empty pattern means "no body check"
pub fn compile_pattern(pattern: Option<&str>) -> Result<Option<Regex>, regex::Error> {
    match pattern {
        None | Some("") => Ok(None),
        Some(pattern) => Regex::new(pattern).map(Some),
    }
}

pub fn is_valid_pattern(pattern: Option<&str>) -> bool {
    compile_pattern(pattern).is_ok()
}

/// Validate a single row into a `Target`
pub fn validate_target(raw: &RawTarget, bounds: IntervalBounds) -> Result<Target> {
    if !is_valid_url(&raw.url) {
        return Err(anyhow!("URL must include a scheme and a host"));
    }

    let interval_seconds = parse_interval(&raw.interval, bounds).ok_or_else(|| {
        anyhow!("interval must be a whole number of seconds in [{}, {}]", bounds.min, bounds.max)
    })?;

    let pattern =
        compile_pattern(raw.pattern.as_deref()).map_err(|e| anyhow!("invalid pattern: {e}"))?;

    Ok(Target::new(raw.url.clone(), interval_seconds, pattern))
}

/// Keep the valid rows, in input order
pub fn validate_targets<'a>(
    rows: impl IntoIterator<Item = &'a RawTarget>,
    bounds: IntervalBounds,
) -> Vec<Target> {
    rows.into_iter()
        .filter_map(|raw| match validate_target(raw, bounds) {
            Ok(target) => Some(target),
            Err(e) => {
                tracing::warn!(
                    "Invalid URL data: {}, {}, {} ({})",
                    raw.url,
                    raw.interval,
                    raw.pattern.as_deref().unwrap_or(""),
                    e
                );
                None
            }
        })
        .collect()
}
