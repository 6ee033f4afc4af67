use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Currency};
use crate::error::TypeError;

/// Smallest mantissa of a normalized, non-zero issued amount.
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
/// Largest mantissa of a normalized issued amount.
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;
/// Smallest exponent of a normalized, non-zero issued amount.
pub const MIN_EXPONENT: i32 = -96;
/// Largest exponent of a normalized issued amount.
pub const MAX_EXPONENT: i32 = 80;
/// Exponent carried by a canonical issued zero.
pub const ZERO_EXPONENT: i32 = -100;
/// Largest magnitude of a native amount, in drops (62 bits).
pub const MAX_NATIVE_DROPS: u64 = (1 << 62) - 1;

/// Composite monetary amount: either native drops or an issued value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amount {
    Native { drops: u64, negative: bool },
    Issued(IssuedAmount),
}

/// Issued (non-native) amount in normalized scientific form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuedAmount {
    mantissa: u64,
    exponent: i32,
    negative: bool,
    currency: Currency,
    issuer: AccountId,
}

impl Amount {
    /// Native amount from a signed drop count.
    pub fn native(drops: i64) -> Result<Self, TypeError> {
        let magnitude = drops.unsigned_abs();
        if magnitude > MAX_NATIVE_DROPS {
            return Err(TypeError::AmountOutOfRange(format!("{drops} drops")));
        }
        Ok(Self::Native {
            drops: magnitude,
            negative: drops < 0,
        })
    }

    /// Native amount from its raw magnitude and sign, as read off the wire.
    ///
    /// Negative zero is rejected.
    pub fn native_from_parts(drops: u64, negative: bool) -> Result<Self, TypeError> {
        if drops > MAX_NATIVE_DROPS {
            return Err(TypeError::AmountOutOfRange(format!("{drops} drops")));
        }
        if negative && drops == 0 {
            return Err(TypeError::AmountOutOfRange("negative zero".into()));
        }
        Ok(Self::Native { drops, negative })
    }

    /// Issued amount `(-1)^negative * mantissa * 10^exponent`, normalized.
    pub fn issued(
        mantissa: u64,
        exponent: i32,
        negative: bool,
        currency: Currency,
        issuer: AccountId,
    ) -> Result<Self, TypeError> {
        if currency.is_native() {
            return Err(TypeError::InvalidCurrency(
                "issued amount cannot use the native currency".into(),
            ));
        }
        let (mantissa, exponent) = normalize(mantissa, exponent)?;
        Ok(Self::Issued(IssuedAmount {
            mantissa,
            exponent,
            negative: negative && mantissa != 0,
            currency,
            issuer,
        }))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native { .. })
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Native { drops, .. } => *drops == 0,
            Self::Issued(iou) => iou.mantissa == 0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Self::Native { negative, .. } => *negative,
            Self::Issued(iou) => iou.negative,
        }
    }

    /// Signed drop count of a native amount.
    pub fn drops(&self) -> Option<i64> {
        match self {
            Self::Native { drops, negative } => {
                let value = *drops as i64;
                Some(if *negative { -value } else { value })
            }
            Self::Issued(_) => None,
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            Self::Native { .. } => Currency::native(),
            Self::Issued(iou) => iou.currency,
        }
    }

    pub fn issuer(&self) -> AccountId {
        match self {
            Self::Native { .. } => AccountId::zero(),
            Self::Issued(iou) => iou.issuer,
        }
    }

    /// Decimal rendering of the value without currency or issuer.
    pub fn value_text(&self) -> String {
        match self {
            Self::Native { drops, negative } => {
                if *negative {
                    format!("-{drops}")
                } else {
                    drops.to_string()
                }
            }
            Self::Issued(iou) => iou.value_text(),
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::Native {
            drops: 0,
            negative: false,
        }
    }
}

impl IssuedAmount {
    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn issuer(&self) -> AccountId {
        self.issuer
    }

    fn value_text(&self) -> String {
        if self.mantissa == 0 {
            return "0".into();
        }
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }
        let digits = mantissa.to_string();
        let body = if exponent >= 0 {
            format!("{digits}{}", "0".repeat(exponent as usize))
        } else {
            let point = digits.len() as i32 + exponent;
            if point > 0 {
                let (int, frac) = digits.split_at(point as usize);
                format!("{int}.{frac}")
            } else {
                format!("0.{}{digits}", "0".repeat((-point) as usize))
            }
        };
        if self.negative {
            format!("-{body}")
        } else {
            body
        }
    }
}

fn normalize(mut mantissa: u64, mut exponent: i32) -> Result<(u64, i32), TypeError> {
    if mantissa == 0 {
        return Ok((0, ZERO_EXPONENT));
    }
    while mantissa < MIN_MANTISSA && exponent > MIN_EXPONENT {
        mantissa *= 10;
        exponent -= 1;
    }
    while mantissa > MAX_MANTISSA {
        if exponent >= MAX_EXPONENT {
            return Err(TypeError::AmountOutOfRange("issued value overflow".into()));
        }
        mantissa /= 10;
        exponent += 1;
    }
    if exponent < MIN_EXPONENT || mantissa < MIN_MANTISSA {
        return Ok((0, ZERO_EXPONENT));
    }
    if exponent > MAX_EXPONENT {
        return Err(TypeError::AmountOutOfRange("issued value overflow".into()));
    }
    Ok((mantissa, exponent))
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native { .. } => f.write_str(&self.value_text()),
            Self::Issued(iou) => write!(f, "{}/{}/{}", iou.value_text(), iou.currency, iou.issuer),
        }
    }
}

impl fmt::Debug for IssuedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IssuedAmount({}e{} {})", self.mantissa, self.exponent, self.currency)
    }
}
