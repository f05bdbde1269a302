//! Display formatting for money and dates (pt-BR conventions).

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// `R$ 1.234,56`; negatives get a leading minus.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}

/// `dd/mm/yyyy` of the UTC date.
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("0")), "R$ 0,00");
        assert_eq!(format_currency(dec("5.5")), "R$ 5,50");
        assert_eq!(format_currency(dec("1234.567")), "R$ 1.234,57");
        assert_eq!(format_currency(dec("1000000")), "R$ 1.000.000,00");
        assert_eq!(format_currency(dec("-89.9")), "-R$ 89,90");
    }

    #[test]
    fn test_format_date() {
        let d = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(format_date(d), "09/03/2024");
    }
}
