use chrono::{DateTime, Utc};

/// Humanized distance between `then` and `now`, e.g. "5 minutes ago" or "in a day".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let phrase = distance(seconds.unsigned_abs());

    if seconds < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

fn distance(seconds: u64) -> String {
    let minutes = rounded(seconds, 60);
    let hours = rounded(seconds, 3_600);
    let days = rounded(seconds, 86_400);
    // 146097 days make 4800 months in the Gregorian cycle
    let months = rounded(days * 4_800, 146_097);
    let years = rounded(months, 12);

    if seconds < 45 {
        "a few seconds".to_owned()
    } else if seconds < 90 {
        "a minute".to_owned()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_owned()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_owned()
    } else if days < 26 {
        format!("{} days", days)
    } else if months <= 1 {
        "a month".to_owned()
    } else if months < 11 {
        format!("{} months", months)
    } else if years <= 1 {
        "a year".to_owned()
    } else {
        format!("{} years", years)
    }
}

fn rounded(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}
