use chrono::{Duration, NaiveDate};
use unicode_width::UnicodeWidthStr;

/// "1 day", "5 days"
pub fn format_day_count(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// "Today", "Yesterday", "Tomorrow", or e.g. "Mon, Mar 04 2024"
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_string()
    } else if date == today + Duration::days(1) {
        "Tomorrow".to_string()
    } else {
        date.format("%a, %b %d %Y").to_string()
    }
}

/// Pads to `width` terminal columns. Emoji count as two columns.
pub fn pad_display(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    if used >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - used))
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
