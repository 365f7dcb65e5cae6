use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Money is represented as integer cents to avoid floating-point precision issues.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Largest accepted amount: 2^50 cents (11,258,999,068,426.24).
///
/// Every value up to this bound survives the JSON export exactly, since
/// fractional amounts go through `f64`. It also leaves room to sum over
/// eight thousand maximum-size rows in an `i64`.
pub const MAX_CENTS: Cents = 1 << 50;

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.abs();
    let units = abs_cents / 100;
    let remainder = abs_cents % 100;
    format!("{}{}.{:02}", sign, units, remainder)
}

/// Parse a decimal string into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000
///
/// At most two decimal places are accepted; "0.999" is `TooPrecise`.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, input) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let parts: Vec<&str> = input.split('.').collect();
    let cents = match parts.as_slice() {
        [units] => parse_units(units)?
            .checked_mul(100)
            .ok_or(ParseCentsError::OutOfRange)?,
        [units, decimals] => {
            if (units.is_empty() && decimals.is_empty())
                || !decimals.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(ParseCentsError::InvalidFormat);
            }
            let units = if units.is_empty() {
                0
            } else {
                parse_units(units)?
            };

            let fraction = match decimals.len() {
                0 => 0,
                1 => parse_units(decimals)? * 10,
                2 => parse_units(decimals)?,
                _ => return Err(ParseCentsError::TooPrecise),
            };

            units
                .checked_mul(100)
                .and_then(|c| c.checked_add(fraction))
                .ok_or(ParseCentsError::OutOfRange)?
        }
        _ => return Err(ParseCentsError::InvalidFormat),
    };

    Ok(if negative { -cents } else { cents })
}

fn parse_units(digits: &str) -> Result<i64, ParseCentsError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    digits.parse().map_err(|_| ParseCentsError::OutOfRange)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    TooPrecise,
    OutOfRange,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::TooPrecise => write!(f, "at most two decimal places are allowed"),
            ParseCentsError::OutOfRange => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseCentsError {}

/// Non-negative transaction magnitude.
///
/// Exported as a plain JSON number: whole amounts as integers (`500`),
/// fractional ones as decimals (`12.5`). Deserialization also accepts the
/// numeric strings a form would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Cents);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const MAX: Amount = Amount(MAX_CENTS);

    /// Returns `None` for negative values and values above `MAX_CENTS`.
    pub fn from_cents(cents: Cents) -> Option<Self> {
        (0..=MAX_CENTS).contains(&cents).then_some(Self(cents))
    }

    pub fn from_units(units: u32) -> Self {
        Self(Cents::from(units) * 100)
    }

    pub fn parse(input: &str) -> Result<Self, ParseCentsError> {
        Self::checked(parse_cents(input)?)
    }

    fn checked(cents: Cents) -> Result<Self, ParseCentsError> {
        if cents < 0 {
            return Err(ParseCentsError::InvalidFormat);
        }
        Self::from_cents(cents).ok_or(ParseCentsError::OutOfRange)
    }

    pub fn cents(&self) -> Cents {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents(self.0))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.0 as f64 / 100.0)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Whole(i64),
            Fractional(f64),
            Text(String),
        }

        let cents = match Raw::deserialize(deserializer)? {
            Raw::Whole(units) => units.checked_mul(100).ok_or(ParseCentsError::OutOfRange),
            Raw::Fractional(value) => {
                let scaled = (value * 100.0).round();
                if !scaled.is_finite() {
                    Err(ParseCentsError::InvalidFormat)
                } else if scaled.abs() > MAX_CENTS as f64 {
                    Err(ParseCentsError::OutOfRange)
                } else {
                    Ok(scaled as Cents)
                }
            }
            Raw::Text(text) => parse_cents(&text),
        };

        cents
            .and_then(Amount::checked)
            .map_err(serde::de::Error::custom)
    }
}
