//! Raw input values and two-digit money rounding.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

/// Number of fractional digits kept for balances and rates
pub const CENTS_SCALE: u32 = 2;

/// Round to two fractional digits, midpoint away from zero
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENTS_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Render with exactly two fractional digits (`500` -> `"500.00"`)
pub fn format_cents(value: Decimal) -> String {
    let mut rounded = round_cents(value);
    rounded.rescale(CENTS_SCALE);
    rounded.to_string()
}

/// Value handed to a validating operation.
///
/// Amounts and rates may come from untyped sources (a script line, a form
/// field), so only [`Operand::Number`] is accepted as a number. Text is kept
/// as text even when it spells a number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Operand {
    /// A genuine number
    Number(Decimal),
    /// A string, never parsed implicitly
    Text(String),
    /// A number a decimal cannot hold: too large, or nonzero but below
    /// the smallest representable fraction
    OutOfRange(String),
    /// Any other value: booleans, lists, maps, non-finite floats
    Other(String),
    /// No value supplied
    #[default]
    Missing,
}

impl Operand {
    /// The value when it is a genuine number
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Operand::Number(num) => Some(*num),
            _ => None,
        }
    }

    /// Loose numeric reading: numbers, and text spelling a decimal literal.
    ///
    /// Only used to order the overdraft check ahead of type validation.
    pub fn numeric_view(&self) -> Option<Decimal> {
        match self {
            Operand::Number(num) => Some(*num),
            Operand::Text(text) => text.trim().parse().ok(),
            Operand::OutOfRange(_) | Operand::Other(_) | Operand::Missing => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(num) => write!(f, "{num}"),
            Operand::Text(text) | Operand::OutOfRange(text) | Operand::Other(text) => {
                f.write_str(text)
            }
            Operand::Missing => f.write_str("undefined"),
        }
    }
}

impl From<Decimal> for Operand {
    fn from(num: Decimal) -> Self {
        Operand::Number(num)
    }
}

macro_rules! operand_from_int {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Operand {
                fn from(num: $int) -> Self {
                    Operand::Number(Decimal::from(num))
                }
            }
        )*
    };
}

operand_from_int!(i32, i64, u32, u64);

impl From<f64> for Operand {
    /// Finite floats go through their shortest decimal rendering, so `0.1`
    /// becomes exactly `0.1` and not its binary approximation.
    fn from(num: f64) -> Self {
        if !num.is_finite() {
            return Operand::Other(num.to_string());
        }
        let rendered = num.to_string();
        match rendered.parse::<Decimal>() {
            // parsing rounds away fractions past 28 digits
            Ok(dec) if dec.is_zero() && num != 0.0 => Operand::OutOfRange(rendered),
            Ok(dec) => Operand::Number(dec),
            Err(_) => Operand::OutOfRange(rendered),
        }
    }
}

impl From<&str> for Operand {
    fn from(text: &str) -> Self {
        Operand::Text(text.to_owned())
    }
}

impl From<String> for Operand {
    fn from(text: String) -> Self {
        Operand::Text(text)
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OperandVisitor)
    }
}

struct OperandVisitor;

impl<'de> Visitor<'de> for OperandVisitor {
    type Value = Operand;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Operand, E> {
        Ok(Operand::Other(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Operand, E> {
        Ok(v.into())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Operand, E> {
        Ok(v.into())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Operand, E> {
        Ok(v.into())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Operand, E> {
        Ok(v.into())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Operand, E> {
        Ok(v.into())
    }

    fn visit_none<E: de::Error>(self) -> Result<Operand, E> {
        Ok(Operand::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Operand, E> {
        Ok(Operand::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Operand, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Operand, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Operand::Other("[list]".to_owned()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Operand, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Operand::Other("[object]".to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::{format_cents, round_cents, Operand};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_midpoint_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1537.809166)), dec!(1537.81));
        assert_eq!(round_cents(dec!(1030.301)), dec!(1030.30));
    }

    #[test]
    fn formats_exactly_two_digits() {
        assert_eq!(format_cents(dec!(500)), "500.00");
        assert_eq!(format_cents(dec!(1020.1)), "1020.10");
        assert_eq!(format_cents(dec!(0)), "0.00");
        assert_eq!(format_cents(dec!(12.345)), "12.35");
    }

    #[test]
    fn floats_keep_their_decimal_spelling() {
        assert_eq!(Operand::from(0.1), Operand::Number(dec!(0.1)));
        assert_eq!(Operand::from(1500.0), Operand::Number(dec!(1500)));
        assert!(matches!(Operand::from(f64::NAN), Operand::Other(_)));
        assert!(matches!(Operand::from(f64::INFINITY), Operand::Other(_)));
    }

    #[test]
    fn unrepresentable_floats_stay_numbers() {
        let huge = Operand::from(1e30);
        assert!(matches!(huge, Operand::OutOfRange(_)));
        assert_eq!(huge.as_number(), None);
        assert_eq!(huge.numeric_view(), None);

        assert!(matches!(Operand::from(1e-30), Operand::OutOfRange(_)));
        assert!(matches!(Operand::from(-1e-30), Operand::OutOfRange(_)));
        assert_eq!(Operand::from(0.0), Operand::Number(Decimal::ZERO));
    }

    #[test]
    fn deserialize_unrepresentable_numbers() {
        let ops: Vec<Operand> = serde_json::from_str("[1e30, 1e-30, -1e30]").unwrap();
        assert_eq!(ops.len(), 3);
        for op in ops {
            assert!(matches!(op, Operand::OutOfRange(_)), "{op:?}");
        }
    }

    #[test]
    fn text_is_never_a_number() {
        let op = Operand::from("500");
        assert_eq!(op.as_number(), None);
        assert_eq!(op.numeric_view(), Some(dec!(500)));
        assert_eq!(Operand::from("%").numeric_view(), None);
    }

    #[test]
    fn deserialize_keeps_json_types_apart() {
        let ops: Vec<Operand> =
            serde_json::from_str(r#"[500, 0.2, -3, "500", true, null, [1], {"a": 1}]"#).unwrap();
        assert_eq!(
            ops,
            vec![
                Operand::Number(dec!(500)),
                Operand::Number(dec!(0.2)),
                Operand::Number(dec!(-3)),
                Operand::Text("500".to_owned()),
                Operand::Other("true".to_owned()),
                Operand::Missing,
                Operand::Other("[list]".to_owned()),
                Operand::Other("[object]".to_owned()),
            ]
        );
    }

    #[test]
    fn displays_raw_value() {
        assert_eq!(Operand::from(12).to_string(), "12");
        assert_eq!(Operand::from("%").to_string(), "%");
        assert_eq!(Operand::Missing.to_string(), "undefined");
    }
}
