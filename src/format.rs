//! Display helpers shared by the catalog, payment and messaging surfaces.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as US dollars, e.g. `$1,234.50` or `-$3.20`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// `Oct 6, 2024`
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Oct 6, 2024, 02:30 PM`
pub fn format_date_time(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Relative label for a past instant: `Just now`, `5m ago`, `3h ago`, `2d ago`,
/// falling back to the calendar date after a week.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    match seconds {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s if s < 604_800 => format!("{}d ago", s / 86_400),
        _ => format_date(then),
    }
}

/// Keeps the ASCII digits of `raw`, at most `max` of them.
pub fn digits_only(raw: &str, max: usize) -> String {
    raw.chars().filter(char::is_ascii_digit).take(max).collect()
}

/// Groups up to 16 card digits in blocks of four. Inputs shorter than four
/// digits are returned as bare digits.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw, 16);
    if digits.len() < 4 {
        return digits;
    }
    digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Masks expiry input as `MM/YY`.
pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw, 4);
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Hides every digit except the last four.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 4 {
        return phone.to_string();
    }
    let split = chars.len() - 4;
    chars[..split]
        .iter()
        .map(|c| if c.is_ascii_digit() { '*' } else { *c })
        .chain(chars[split..].iter().copied())
        .collect()
}

/// Keeps the first and last character of the mailbox name: `j******h@example.com`.
pub fn mask_email(email: &str) -> String {
    let Some((user, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let chars: Vec<char> = user.chars().collect();
    if chars.len() <= 2 {
        return email.to_string();
    }
    let hidden = "*".repeat(chars.len() - 2);
    format!("{}{hidden}{}@{domain}", chars[0], chars[chars.len() - 1])
}
