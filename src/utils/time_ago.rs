use chrono::{DateTime, Local, Utc};

const INTERVALS: [(i64, &str); 5] = [
    (31_536_000, "year"),
    (2_592_000, "month"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Renders how long ago `past` was, relative to `now`.
///
/// Uses the largest whole unit that fits; below a minute it falls back to
/// seconds, and anything under ten seconds (or in the future) is "just now".
pub fn time_ago(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - past).num_seconds();

    for (unit_seconds, label) in INTERVALS {
        let count = seconds / unit_seconds;
        if count > 0 {
            return plural(count, label);
        }
    }

    if seconds < 10 {
        "just now".to_string()
    } else {
        plural(seconds, "second")
    }
}

/// Absolute local time, shown as a hover hint next to the relative label.
pub fn local_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn plural(count: i64, label: &str) -> String {
    if count == 1 {
        format!("1 {} ago", label)
    } else {
        format!("{} {}s ago", count, label)
    }
}
