use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ItemType;

#[derive(Debug, Clone)]
pub enum AtomicValue {
    String(String),
    UntypedAtomic(String),
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    Double(f64),
}

impl AtomicValue {
    pub fn type_name(&self) -> &'static str {
        self.item_type().name()
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            AtomicValue::String(_) => ItemType::String,
            AtomicValue::UntypedAtomic(_) => ItemType::UntypedAtomic,
            AtomicValue::Boolean(_) => ItemType::Boolean,
            AtomicValue::Integer(_) => ItemType::Integer,
            AtomicValue::Decimal(_) => ItemType::Decimal,
            AtomicValue::Double(_) => ItemType::Double,
        }
    }

    /// The value cast to `xs:string`.
    pub fn to_string_value(&self) -> String {
        match self {
            AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) => s.clone(),
            AtomicValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            AtomicValue::Integer(i) => i.to_string(),
            AtomicValue::Decimal(d) => d.normalize().to_string(),
            AtomicValue::Double(d) => format_double(*d),
        }
    }

    pub fn to_boolean(&self) -> bool {
        match self {
            AtomicValue::Boolean(b) => *b,
            AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) => !s.is_empty(),
            AtomicValue::Integer(i) => *i != 0,
            AtomicValue::Decimal(d) => !d.is_zero(),
            AtomicValue::Double(d) => *d != 0.0 && !d.is_nan(),
        }
    }

    pub fn to_double(&self) -> f64 {
        match self {
            AtomicValue::Double(d) => *d,
            AtomicValue::Integer(i) => *i as f64,
            AtomicValue::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) => {
                s.trim().parse().unwrap_or(f64::NAN)
            }
            AtomicValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            AtomicValue::Decimal(d) => Some(*d),
            AtomicValue::Integer(i) => Some(Decimal::from(*i)),
            AtomicValue::Double(d) => Decimal::from_f64(*d),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            AtomicValue::Integer(_) | AtomicValue::Decimal(_) | AtomicValue::Double(_)
        )
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self, AtomicValue::String(_) | AtomicValue::UntypedAtomic(_))
    }
}

/// Formats an `xs:double` the way a cast to `xs:string` does for the common
/// range: integral values without a fractional part, specials by name.
fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_infinite() {
        if d > 0.0 { "INF" } else { "-INF" }.to_string()
    } else if d == 0.0 {
        if d.is_sign_negative() { "-0" } else { "0" }.to_string()
    } else if d.fract() == 0.0 && d.abs() < 1e15 {
        format!("{}", d as i64)
    } else {
        d.to_string()
    }
}

impl PartialEq for AtomicValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a.is_string_like() && b.is_string_like() => {
                a.to_string_value() == b.to_string_value()
            }
            (AtomicValue::Boolean(a), AtomicValue::Boolean(b)) => a == b,
            (AtomicValue::Integer(a), AtomicValue::Integer(b)) => a == b,
            (AtomicValue::Double(a), AtomicValue::Double(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (a, b) if a.is_numeric() && b.is_numeric() => match (a.to_decimal(), b.to_decimal()) {
                (Some(x), Some(y))
                    if !matches!(a, AtomicValue::Double(_))
                        && !matches!(b, AtomicValue::Double(_)) =>
                {
                    x == y
                }
                _ => a.to_double() == b.to_double(),
            },
            _ => false,
        }
    }
}

impl Eq for AtomicValue {}

impl Hash for AtomicValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            AtomicValue::String(s) | AtomicValue::UntypedAtomic(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            AtomicValue::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            // Numerics that compare equal must hash equal.
            AtomicValue::Integer(_) | AtomicValue::Decimal(_) | AtomicValue::Double(_) => {
                2u8.hash(state);
                self.to_double().to_bits().hash(state);
            }
        }
    }
}

impl PartialOrd for AtomicValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (a, b) if a.is_string_like() && b.is_string_like() => {
                Some(a.to_string_value().cmp(&b.to_string_value()))
            }
            (AtomicValue::Integer(a), AtomicValue::Integer(b)) => a.partial_cmp(b),
            (AtomicValue::Decimal(a), AtomicValue::Decimal(b)) => a.partial_cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => a.to_double().partial_cmp(&b.to_double()),
            (AtomicValue::Boolean(a), AtomicValue::Boolean(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

impl From<String> for AtomicValue {
    fn from(s: String) -> Self {
        AtomicValue::String(s)
    }
}

impl From<&str> for AtomicValue {
    fn from(s: &str) -> Self {
        AtomicValue::String(s.to_string())
    }
}

impl From<bool> for AtomicValue {
    fn from(b: bool) -> Self {
        AtomicValue::Boolean(b)
    }
}

impl From<i64> for AtomicValue {
    fn from(i: i64) -> Self {
        AtomicValue::Integer(i)
    }
}

impl From<f64> for AtomicValue {
    fn from(d: f64) -> Self {
        AtomicValue::Double(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_value_of_numbers() {
        assert_eq!(AtomicValue::Integer(42).to_string_value(), "42");
        assert_eq!(AtomicValue::Double(3.0).to_string_value(), "3");
        assert_eq!(AtomicValue::Double(0.5).to_string_value(), "0.5");
        assert_eq!(AtomicValue::Double(f64::NAN).to_string_value(), "NaN");
        assert_eq!(AtomicValue::Double(f64::NEG_INFINITY).to_string_value(), "-INF");
        let d: Decimal = "12.50".parse().unwrap();
        assert_eq!(AtomicValue::Decimal(d).to_string_value(), "12.5");
    }

    #[test]
    fn test_untyped_compares_as_string() {
        assert_eq!(
            AtomicValue::UntypedAtomic("a".into()),
            AtomicValue::String("a".into())
        );
        assert!(AtomicValue::String("abc".into()) < AtomicValue::UntypedAtomic("abd".into()));
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(AtomicValue::Integer(5), AtomicValue::Double(5.0));
        let d: Decimal = "5.0".parse().unwrap();
        assert_eq!(AtomicValue::Integer(5), AtomicValue::Decimal(d));
        assert_ne!(AtomicValue::Integer(5), AtomicValue::Integer(6));
    }

    #[test]
    fn test_boolean_conversion() {
        assert!(!AtomicValue::String(String::new()).to_boolean());
        assert!(AtomicValue::Double(0.1).to_boolean());
        assert!(!AtomicValue::Double(f64::NAN).to_boolean());
    }
}
