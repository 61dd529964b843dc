//! Unit tests for the Money module
//!
//! Tests cover creation, rounding, arithmetic, predicates and formatting.

use core_kernel::{Money, MoneyError, BALANCE_EPSILON};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_major() {
        assert_eq!(Money::from_major(15000).amount(), dec!(15000));
    }

    #[test]
    fn test_from_decimal() {
        let m: Money = dec!(42.5).into();
        assert_eq!(m, Money::new(dec!(42.5)));
    }

    #[test]
    fn test_zero_and_default_agree() {
        assert_eq!(Money::zero(), Money::default());
        assert_eq!(Money::ZERO.amount(), Decimal::ZERO);
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_assign_and_sub_assign() {
        let mut m = Money::from_major(1000);
        m += Money::from_major(250);
        m -= Money::from_major(50);
        assert_eq!(m, Money::from_major(1200));
    }

    #[test]
    fn test_sum_of_references() {
        let parts = vec![Money::from_major(1), Money::from_major(2), Money::from_major(3)];
        let total: Money = parts.iter().sum();
        assert_eq!(total, Money::from_major(6));
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max.checked_add(&Money::from_major(1)), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_abs_of_negative() {
        assert_eq!(Money::from_major(-300).abs(), Money::from_major(300));
    }

    #[test]
    fn test_round_dp_half_away_from_zero() {
        assert_eq!(Money::new(dec!(10.005)).round_dp(2).amount(), dec!(10.01));
        assert_eq!(Money::new(dec!(-10.005)).round_dp(2).amount(), dec!(-10.01));
    }
}

mod comparison {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Money::from_major(5) > Money::from_major(-5));
        assert_eq!(
            Money::from_major(5).max(Money::from_major(7)),
            Money::from_major(7)
        );
    }

    #[test]
    fn test_epsilon_is_one_hundredth() {
        assert_eq!(BALANCE_EPSILON.amount(), dec!(0.01));
    }
}

mod formatting {
    use super::*;

    #[test]
    fn test_display_two_places() {
        assert_eq!(Money::new(dec!(1234.5)).to_string(), "1234.50");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&Money::new(dec!(12.5))).unwrap();
        assert_eq!(json, "\"12.5\"");

        let from_number: Money = serde_json::from_str("1500").unwrap();
        assert_eq!(from_number, Money::from_major(1500));
    }

    #[test]
    fn test_deserialize_rounds_to_storage_precision() {
        let money: Money = serde_json::from_str("\"0.00014\"").unwrap();
        assert_eq!(money.amount(), dec!(0.0001));

        let negative: Money = serde_json::from_str("-2.71828").unwrap();
        assert_eq!(negative.amount(), dec!(-2.7183));
    }
}
