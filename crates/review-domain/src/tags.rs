//! Tag conventions understood by the scheduler.

/// Tags of the form `Reminder::ReminderN` cap the scheduled interval of a
/// card at `N` days.
pub const REMINDER_TAG_PREFIX: &str = "Reminder::Reminder";

/// Parses the day cap out of a reminder tag.
///
/// Returns `None` for tags without the prefix and for tags whose remainder
/// is not an integer, so a malformed user tag never aborts grading.
#[must_use]
pub fn reminder_cap_days(tag: &str) -> Option<i64> {
    tag.strip_prefix(REMINDER_TAG_PREFIX)?.parse().ok()
}

/// Iterates the day caps of every reminder tag in the given tag list.
pub fn reminder_caps(tags: &[String]) -> impl Iterator<Item = i64> + '_ {
    tags.iter().filter_map(|tag| reminder_cap_days(tag))
}
