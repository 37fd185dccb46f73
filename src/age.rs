use chrono::{DateTime, Duration, Utc};

/// Formats the time elapsed between `then` and `now` using its largest whole unit,
/// such as `1 day ago` or `5 minutes ago`.
///
/// Timestamps after `now` are treated as having just happened.
pub fn format(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
	let elapsed = (now - then).max(Duration::zero());

	let (count, unit) = if elapsed.num_days() >= 1 {
		(elapsed.num_days(), "day")
	} else if elapsed.num_hours() >= 1 {
		(elapsed.num_hours(), "hour")
	} else if elapsed.num_minutes() >= 1 {
		(elapsed.num_minutes(), "minute")
	} else {
		(elapsed.num_seconds(), "second")
	};

	if count == 1 {
		format!("1 {unit} ago")
	} else {
		format!("{count} {unit}s ago")
	}
}
