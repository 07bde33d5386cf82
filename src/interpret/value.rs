//! Representing values in the interpreter.

use std::fmt;

use num_bigint::{BigInt, Sign};
use num_traits::cast::{FromPrimitive, ToPrimitive};

use anyhow::Result;

/// Values in our language.
///
/// A closed tagged union: every operator and cast pattern-matches on it and
/// reports a typed failure for unsupported combinations.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/uninitialized value (`NOOB`). Declared-but-unassigned variables
    /// hold this.
    Noob,
    /// Boolean value (`TROOF`): `WIN` or `FAIL`.
    Troof(bool),
    /// Integer value (`NUMBR`), arbitrary precision.
    Numbr(BigInt),
    /// Floating-point value (`NUMBAR`).
    Numbar(f64),
    /// Text value (`YARN`), stored without its quotes.
    Yarn(String),
}

/// The four named cast targets of `MAEK ... A <type>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// Boolean.
    Troof,
    /// Integer.
    Numbr,
    /// Floating-point.
    Numbar,
    /// Text.
    Yarn,
}

impl Type {
    /// Resolves a type-name token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TROOF" => Some(Type::Troof),
            "NUMBR" => Some(Type::Numbr),
            "NUMBAR" => Some(Type::Numbar),
            "YARN" => Some(Type::Yarn),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Troof => write!(f, "TROOF"),
            Type::Numbr => write!(f, "NUMBR"),
            Type::Numbar => write!(f, "NUMBAR"),
            Type::Yarn => write!(f, "YARN"),
        }
    }
}

/// Converts an integer to a float, saturating to an infinity when it does
/// not fit.
pub(crate) fn to_f64(i: &BigInt) -> f64 {
    i.to_f64().unwrap_or(if i.sign() == Sign::Minus {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    })
}

impl Value {
    /// Resolves a boolean/null literal token (`WIN`, `FAIL`, `NOOB`).
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "WIN" => Some(Value::Troof(true)),
            "FAIL" => Some(Value::Troof(false)),
            "NOOB" => Some(Value::Noob),
            _ => None,
        }
    }

    /// Parses a numeric literal: integer first, then float.
    pub fn parse_scalar(text: &str) -> Option<Self> {
        if let Ok(i) = text.parse::<BigInt>() {
            return Some(Value::Numbr(i));
        }
        text.parse::<f64>().ok().map(Value::Numbar)
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Noob => "NOOB",
            Value::Troof(_) => "TROOF",
            Value::Numbr(_) => "NUMBR",
            Value::Numbar(_) => "NUMBAR",
            Value::Yarn(_) => "YARN",
        }
    }

    /// Truthiness of the value: `FAIL`, `NOOB`, zero and the empty `YARN`
    /// are false, everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Noob => false,
            Value::Troof(b) => *b,
            Value::Numbr(i) => i.sign() != Sign::NoSign,
            Value::Numbar(f) => *f != 0.0,
            Value::Yarn(s) => !s.is_empty(),
        }
    }

    /// Casts the value to the requested type.
    ///
    /// Text sources must lexically be a valid number for the numeric
    /// targets; any other unsupported conversion is an error too.
    pub fn cast(self, ty: Type) -> Result<Value> {
        let value = match (ty, self) {
            (Type::Troof, v) => Value::Troof(v.truthy()),
            (Type::Yarn, v) => Value::Yarn(v.to_string()),

            (Type::Numbr, Value::Troof(b)) => Value::Numbr(BigInt::from(i32::from(b))),
            (Type::Numbr, v @ Value::Numbr(_)) => v,
            (Type::Numbr, Value::Numbar(f)) => Value::Numbr(
                BigInt::from_f64(f.trunc())
                    .ok_or_else(|| anyhow!("invalid cast: cannot cast NUMBAR {f} to NUMBR"))?,
            ),
            (Type::Numbr, Value::Yarn(s)) => Value::Numbr(
                s.trim()
                    .parse::<BigInt>()
                    .map_err(|_| anyhow!("invalid cast: cannot cast YARN \"{s}\" to NUMBR"))?,
            ),

            (Type::Numbar, Value::Troof(b)) => Value::Numbar(f64::from(u8::from(b))),
            (Type::Numbar, Value::Numbr(i)) => Value::Numbar(to_f64(&i)),
            (Type::Numbar, v @ Value::Numbar(_)) => v,
            (Type::Numbar, Value::Yarn(s)) => Value::Numbar(
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("invalid cast: cannot cast YARN \"{s}\" to NUMBAR"))?,
            ),

            (_, Value::Noob) => bail!("invalid cast: cannot cast NOOB to {ty}"),
        };
        Ok(value)
    }
}

impl fmt::Display for Value {
    /// Text form of a value, using the canonical language literals for
    /// booleans and null. This is what `VISIBLE` prints and what a `YARN`
    /// cast produces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Noob => write!(f, "NOOB"),
            Value::Troof(true) => write!(f, "WIN"),
            Value::Troof(false) => write!(f, "FAIL"),
            Value::Numbr(i) => fmt::Display::fmt(i, f),
            Value::Numbar(x) => {
                // Keep a decimal point on round floats so they still read
                // as NUMBARs.
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Yarn(s) => write!(f, "{s}"),
        }
    }
}
