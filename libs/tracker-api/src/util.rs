use chrono::{DateTime, Utc};

/// Текущее время UTC.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Human-readable age of `then` relative to `now`.
///
/// Works on whole elapsed seconds; every step divides with truncation:
/// - `< 1 min` → `"just now"` (timestamps in the future land here too)
/// - `1 min` → `"1 minute ago"`, `< 60 min` → `"N minutes ago"`
/// - `1 h` → `"1 hour ago"`, `< 24 h` → `"N hours ago"`
/// - `1 day` → `"1 day ago"`, otherwise `"N days ago"`
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_seconds() / 60;

    if minutes < 1 {
        return "just now".to_string();
    } else if minutes == 1 {
        return "1 minute ago".to_string();
    } else if minutes < 60 {
        return format!("{minutes} minutes ago");
    }

    let hours = minutes / 60;
    if hours == 1 {
        return "1 hour ago".to_string();
    } else if hours < 24 {
        return format!("{hours} hours ago");
    }

    let days = hours / 24;
    if days == 1 {
        return "1 day ago".to_string();
    }
    format!("{days} days ago")
}
