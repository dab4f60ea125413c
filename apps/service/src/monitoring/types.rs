use std::time::Duration;

use regex::Regex;

/// A validated endpoint to poll
#[derive(Debug, Clone)]
pub struct Target {
    /// URL to fetch with a plain GET
    pub url: String,

    /// Seconds to sleep between the end of one cycle and the start of the next
    pub interval_seconds: u64,

    /// Optional pattern searched for in the response body
    pub pattern: Option<Regex>,
}

impl Target {
    pub fn new(url: impl Into<String>, interval_seconds: u64, pattern: Option<Regex>) -> Self {
        Self { url: url.into(), interval_seconds, pattern }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Match the body against the pattern, `None` when no pattern is configured
    pub fn evaluate(&self, body: &str) -> Option<bool> {
        self.pattern.as_ref().map(|pattern| pattern.is_match(body))
    }
}

/// Result of one completed fetch, ready for persistence.
///
/// The observation time is assigned by storage when the row is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub url: String,

    /// HTTP status code of the response
    pub status_code: u16,

    /// Whether the body matched; `None` if the target has no pattern
    pub regex_matched: Option<bool>,

    /// Time from sending the request to receiving the response head
    pub response_time_seconds: f64,

    pub body: String,
}

impl Observation {
    pub fn new(target: &Target, status_code: u16, elapsed: Duration, body: String) -> Self {
        Self {
            url: target.url.clone(),
            status_code,
            regex_matched: target.evaluate(&body),
            response_time_seconds: elapsed.as_secs_f64(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_without_pattern() {
        let target = Target::new("https://example.com", 10, None);
        let observation =
            Observation::new(&target, 204, Duration::from_millis(250), "anything".into());

        assert_eq!(observation.url, "https://example.com");
        assert_eq!(observation.status_code, 204);
        assert_eq!(observation.regex_matched, None);
        assert_eq!(observation.response_time_seconds, 0.25);
    }

    #[test]
    fn test_pattern_is_searched_not_anchored() {
        let target =
            Target::new("https://example.com", 10, Some(Regex::new(r"token\d+").unwrap()));

        assert_eq!(target.evaluate("prefix token42 suffix"), Some(true));
        assert_eq!(target.evaluate("no tokens here"), Some(false));
    }
}
