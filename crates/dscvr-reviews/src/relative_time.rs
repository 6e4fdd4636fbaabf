//! Human relative dates, in both directions.
//!
//! [`format_relative_date`] renders an instant as `"3 days ago"` using flat
//! 30-day months and 365-day years. [`parse_relative_description`] goes the
//! other way for vendor strings such as `"2 weeks ago"`, best-effort.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use dscvr_core::Review;
use regex::Regex;

const SECS_PER_DAY: i64 = 86_400;

static RELATIVE_AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(a|an|one|\d+)\s+(second|minute|hour|day|week|month|year)s?\s+ago$")
        .expect("valid regex")
});

/// Formats the age of `at` as seen from `now`.
///
/// | days elapsed | output |
/// |---|---|
/// | 0 (or in the future) | `Today` |
/// | 1 | `Yesterday` |
/// | 2–6 | `{n} days ago` |
/// | 7–29 | `{n / 7} weeks ago` |
/// | 30–364 | `{n / 30} months ago` |
/// | 365+ | `{n / 365} years ago` |
///
/// Counts are never singularized: seven days is `"1 weeks ago"`.
#[must_use]
pub fn format_relative_date(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - at).num_days().max(0);
    match days {
        0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => format!("{} years ago", days / 365),
    }
}

/// Like [`format_relative_date`] for an RFC 3339 timestamp string.
///
/// Returns an empty string when `raw` does not parse.
#[must_use]
pub fn format_relative_date_str(raw: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => format_relative_date(at.with_timezone(&Utc), now),
        Err(e) => {
            tracing::debug!(raw, error = %e, "unparseable review timestamp");
            String::new()
        }
    }
}

/// Estimates the instant a vendor description like `"3 days ago"` refers to.
///
/// Understands `"a moment ago"`, `"just now"`, `"today"`, `"yesterday"`,
/// `"last week"`/`"last month"`/`"last year"`, and `"<n|a|an> <unit>[s] ago"`
/// for seconds through years. Anything else yields `None`.
#[must_use]
pub fn parse_relative_description(description: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let text = description.trim().to_ascii_lowercase();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let unit_secs = |unit: &str| -> Option<i64> {
        Some(match unit {
            "second" => 1,
            "minute" => 60,
            "hour" => 3_600,
            "day" => SECS_PER_DAY,
            "week" => 7 * SECS_PER_DAY,
            "month" => 30 * SECS_PER_DAY,
            "year" => 365 * SECS_PER_DAY,
            _ => return None,
        })
    };

    let ago_secs = match text.as_str() {
        "just now" | "a moment ago" | "moments ago" | "today" => 0,
        "yesterday" => SECS_PER_DAY,
        "last week" => unit_secs("week")?,
        "last month" => unit_secs("month")?,
        "last year" => unit_secs("year")?,
        _ => {
            let caps = RELATIVE_AGO.captures(&text)?;
            let amount: i64 = match &caps[1] {
                "a" | "an" | "one" => 1,
                n => n.parse().ok()?,
            };
            amount.checked_mul(unit_secs(&caps[2])?)?
        }
    };

    now.checked_sub_signed(Duration::try_seconds(ago_secs)?)
}

/// The label shown next to a review: its age from `created_at`, else the
/// vendor's own description, else nothing.
#[must_use]
pub fn display_date(review: &Review, now: DateTime<Utc>) -> String {
    match (review.created_at, review.relative_time.as_deref()) {
        (Some(at), _) => format_relative_date(at, now),
        (None, Some(description)) => description.to_owned(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use dscvr_core::ReviewSource;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 18, 0, 0).unwrap()
    }

    fn days_before(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    #[test]
    fn format_day_boundaries() {
        let cases = [
            (0, "Today"),
            (1, "Yesterday"),
            (2, "2 days ago"),
            (6, "6 days ago"),
            (7, "1 weeks ago"),
            (13, "1 weeks ago"),
            (14, "2 weeks ago"),
            (29, "4 weeks ago"),
            (30, "1 months ago"),
            (59, "1 months ago"),
            (364, "12 months ago"),
            (365, "1 years ago"),
            (800, "2 years ago"),
        ];
        for (days, expected) in cases {
            assert_eq!(
                format_relative_date(days_before(days), now()),
                expected,
                "days = {days}"
            );
        }
    }

    #[test]
    fn format_floors_partial_days() {
        let at = now() - Duration::hours(47);
        assert_eq!(format_relative_date(at, now()), "Yesterday");
        let at = now() - Duration::hours(23);
        assert_eq!(format_relative_date(at, now()), "Today");
    }

    #[test]
    fn format_future_timestamp_is_today() {
        let at = now() + Duration::days(3);
        assert_eq!(format_relative_date(at, now()), "Today");
    }

    #[test]
    fn format_str_parses_rfc3339_with_offset() {
        assert_eq!(
            format_relative_date_str("2026-03-12T09:00:00-05:00", now()),
            "3 days ago"
        );
    }

    #[test]
    fn format_str_returns_empty_for_garbage() {
        assert_eq!(format_relative_date_str("last tuesday", now()), "");
        assert_eq!(format_relative_date_str("", now()), "");
    }

    #[test]
    fn parse_numeric_descriptions() {
        assert_eq!(
            parse_relative_description("3 days ago", now()),
            Some(days_before(3))
        );
        assert_eq!(
            parse_relative_description("2 weeks ago", now()),
            Some(days_before(14))
        );
        assert_eq!(
            parse_relative_description("5 months ago", now()),
            Some(days_before(150))
        );
        assert_eq!(
            parse_relative_description("10 hours ago", now()),
            Some(now() - Duration::hours(10))
        );
    }

    #[test]
    fn parse_article_descriptions() {
        assert_eq!(
            parse_relative_description("a week ago", now()),
            Some(days_before(7))
        );
        assert_eq!(
            parse_relative_description("an hour ago", now()),
            Some(now() - Duration::hours(1))
        );
        assert_eq!(
            parse_relative_description("A year ago", now()),
            Some(days_before(365))
        );
    }

    #[test]
    fn parse_fixed_phrases() {
        assert_eq!(parse_relative_description("a moment ago", now()), Some(now()));
        assert_eq!(parse_relative_description("  Just now ", now()), Some(now()));
        assert_eq!(
            parse_relative_description("yesterday", now()),
            Some(days_before(1))
        );
        assert_eq!(
            parse_relative_description("last week", now()),
            Some(days_before(7))
        );
        assert_eq!(
            parse_relative_description("last month", now()),
            Some(days_before(30))
        );
    }

    #[test]
    fn parse_rejects_unknown_phrasing() {
        assert_eq!(parse_relative_description("in 3 days", now()), None);
        assert_eq!(parse_relative_description("3 fortnights ago", now()), None);
        assert_eq!(parse_relative_description("", now()), None);
    }

    #[test]
    fn parse_rejects_overflowing_amounts() {
        assert_eq!(
            parse_relative_description("99999999999999999999 years ago", now()),
            None
        );
        assert_eq!(
            parse_relative_description("9000000000000000 years ago", now()),
            None
        );
    }

    fn review(created_at: Option<DateTime<Utc>>, relative: Option<&str>) -> Review {
        Review {
            id: "r".to_owned(),
            place_id: "p".to_owned(),
            author_name: "Ana".to_owned(),
            rating: 4,
            body: String::new(),
            created_at,
            relative_time: relative.map(str::to_owned),
            source: ReviewSource::Vendor,
            media: vec![],
        }
    }

    #[test]
    fn display_date_prefers_absolute_timestamp() {
        let r = review(Some(days_before(2)), Some("a week ago"));
        assert_eq!(display_date(&r, now()), "2 days ago");
    }

    #[test]
    fn display_date_falls_back_to_vendor_description() {
        let r = review(None, Some("a week ago"));
        assert_eq!(display_date(&r, now()), "a week ago");
        assert_eq!(display_date(&review(None, None), now()), "");
    }
}
