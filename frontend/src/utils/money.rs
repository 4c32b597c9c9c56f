use rust_decimal::{Decimal, RoundingStrategy};

const MINUTES_PER_HOUR: u32 = 60;

/// Rounds half away from zero to the cent and pins the scale at two places,
/// so the value prints and serializes as `"60.00"`.
pub fn to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Price of `duration_minutes` at `hourly_rate`, rounded to the cent.
pub fn total_amount(duration_minutes: u32, hourly_rate: Decimal) -> Decimal {
    let total = hourly_rate.saturating_mul(Decimal::from(duration_minutes))
        / Decimal::from(MINUTES_PER_HOUR);
    to_cents(total)
}

pub fn format_amount(amount: Decimal) -> String {
    to_cents(amount).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    #[test]
    fn ninety_minutes_at_forty_per_hour_is_sixty() {
        assert_eq!(total_amount(90, Decimal::from(40)).to_string(), "60.00");
        assert_eq!(total_amount(30, dec("40.00")).to_string(), "20.00");
    }

    #[test]
    fn total_rounds_half_away_from_zero_to_the_cent() {
        // 45.55 * 50 / 60 = 37.958..
        assert_eq!(total_amount(50, dec("45.55")).to_string(), "37.96");
        // 0.03 * 30 / 60 = 0.015
        assert_eq!(total_amount(30, dec("0.03")).to_string(), "0.02");
        assert_eq!(total_amount(120, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn formats_with_two_places() {
        assert_eq!(format_amount(Decimal::from(40)), "40.00");
        assert_eq!(format_amount(dec("12.5")), "12.50");
        assert_eq!(format_amount(dec("-3.1")), "-3.10");
        assert_eq!(format_amount(dec("1.005")), "1.01");
    }

    #[test]
    fn deserializes_strings_and_numbers() {
        let values: Vec<Decimal> = serde_json::from_str(r#"["50.00", 40, 37.5]"#).unwrap();
        assert_eq!(values, vec![dec("50"), dec("40"), dec("37.5")]);
        assert_eq!(
            serde_json::to_string(&total_amount(90, Decimal::from(40))).unwrap(),
            "\"60.00\""
        );
    }

    #[test]
    fn large_amounts_are_read_without_overflow() {
        let from_number: Decimal = serde_json::from_str("100000000000000000").unwrap();
        assert_eq!(from_number, dec("100000000000000000"));
        let from_string: Decimal = serde_json::from_str(r#""99999999999999999.00""#).unwrap();
        assert_eq!(format_amount(from_string), "99999999999999999.00");
        assert!(serde_json::from_str::<Decimal>(r#""abc""#).is_err());
    }

    #[test]
    fn total_of_a_large_rate_keeps_every_digit() {
        let total = total_amount(90, dec("100000000000000000"));
        assert_eq!(total.to_string(), "150000000000000000.00");
    }
}
