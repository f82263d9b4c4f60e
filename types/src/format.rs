//! Display helpers shared by the dashboard's pages.

use jiff::civil::Date;

pub fn work_hours(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds % 3600 / 60;

    match (hours, minutes) {
        (0, 0) => "0h".to_string(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Rupees with Indian digit grouping (`₹12,34,567`), rounded to a whole amount.
pub fn inr(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    if rounded < 0.0 {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}

pub fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn hours(value: f64) -> String {
    format!("{value:.1}h")
}

/// `Jan 5, 2025` from a JIRA timestamp such as `2025-01-05T10:00:00.000+0000`.
/// Anything unparseable is shown as given.
pub fn date(timestamp: &str) -> String {
    timestamp
        .get(..10)
        .and_then(|day| day.parse::<Date>().ok())
        .map(|day| day.strftime("%b %-d, %Y").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Up to two upper-case initials, one per word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

pub fn status_badge(status_category: &str) -> &'static str {
    match status_category.to_lowercase().as_str() {
        "done" => "badge badge-green",
        "indeterminate" => "badge badge-yellow",
        "new" | "to do" => "badge badge-blue",
        _ => "badge badge-gray",
    }
}

pub fn category_badge(category: Option<&str>) -> &'static str {
    match category.map(str::to_lowercase).as_deref() {
        Some("paid") => "badge badge-emerald",
        Some("unpaid") => "badge badge-orange",
        _ => "badge badge-gray",
    }
}

pub fn project_type_badge(project_type: &str) -> &'static str {
    match project_type {
        "software" => "badge badge-blue",
        "business" => "badge badge-green",
        _ => "badge badge-gray",
    }
}

pub fn priority_badge(priority: &str) -> &'static str {
    match priority.to_lowercase().as_str() {
        "highest" | "high" => "badge badge-red",
        "medium" => "badge badge-yellow",
        "low" | "lowest" => "badge badge-green",
        _ => "badge badge-gray",
    }
}

/// Text colour for a profit figure; breaking even is neutral.
pub fn profit_class(profit: f64) -> &'static str {
    if profit < 0.0 {
        "text-loss"
    } else if profit > 0.0 {
        "text-profit"
    } else {
        "text-muted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0h")]
    #[case(59, "0h")]
    #[case(2700, "45m")]
    #[case(7200, "2h")]
    #[case(9000, "2h 30m")]
    #[case(90_061, "25h 1m")]
    fn work_hours_cases(#[case] seconds: u64, #[case] expected: &str) {
        assert_eq!(work_hours(seconds), expected);
    }

    #[rstest]
    #[case(0.0, "₹0")]
    #[case(999.4, "₹999")]
    #[case(1000.0, "₹1,000")]
    #[case(123_456.0, "₹1,23,456")]
    #[case(12_345_678.9, "₹1,23,45,679")]
    #[case(-45_000.0, "-₹45,000")]
    fn inr_grouping(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(inr(amount), expected);
    }

    #[test]
    fn percentage_has_one_decimal() {
        assert_eq!(percentage(12.345), "12.3%");
        assert_eq!(percentage(-100.0), "-100.0%");
        assert_eq!(percentage(0.0), "0.0%");
    }

    #[rstest]
    #[case("2025-01-05T10:00:00.000+0000", "Jan 5, 2025")]
    #[case("2024-12-31", "Dec 31, 2024")]
    #[case("yesterday", "yesterday")]
    #[case("", "")]
    fn dates(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(date(input), expected);
    }

    #[rstest]
    #[case("Acme Portal", "AP")]
    #[case("internal tools revamp", "IT")]
    #[case("  solo ", "S")]
    #[case("", "")]
    fn initials_cases(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(initials(name), expected);
    }

    #[test]
    fn badges() {
        assert_eq!(status_badge("Done"), "badge badge-green");
        assert_eq!(status_badge("To Do"), "badge badge-blue");
        assert_eq!(category_badge(Some("Unpaid")), "badge badge-orange");
        assert_eq!(category_badge(None), "badge badge-gray");
        assert_eq!(project_type_badge("business"), "badge badge-green");
        assert_eq!(priority_badge("Highest"), "badge badge-red");
        assert_eq!(priority_badge("Lowest"), "badge badge-green");
    }

    #[rstest]
    #[case(1500.0, "text-profit")]
    #[case(-0.5, "text-loss")]
    #[case(0.0, "text-muted")]
    fn profit_tone(#[case] profit: f64, #[case] expected: &str) {
        assert_eq!(profit_class(profit), expected);
    }
}
