//! Wire encodings of the leaf value kinds.
//!
//! Composite kinds (nested records and arrays of records) are encoded by the
//! record layer, which owns the field registry needed to decode them.

use xrec_types::amount::{MAX_EXPONENT, MAX_MANTISSA, MIN_EXPONENT, MIN_MANTISSA};
use xrec_types::{
    AccountId, Amount, Currency, Hash128, Hash160, Hash256, PathElement, PathSet, Vector256,
};

use crate::error::{CodecError, CodecResult};
use crate::serial_iter::SerialIter;
use crate::serializer::Serializer;

const AMOUNT_NOT_NATIVE: u64 = 0x8000_0000_0000_0000;
const AMOUNT_POSITIVE: u64 = 0x4000_0000_0000_0000;
const AMOUNT_MANTISSA_MASK: u64 = (1 << 54) - 1;
const AMOUNT_EXPONENT_BIAS: i32 = 97;

const PATH_END: u8 = 0x00;
const PATH_BOUNDARY: u8 = 0xFF;

/// Uniform encode/decode interface over a leaf value kind.
pub trait WireCodec: Sized {
    fn encode(&self, s: &mut Serializer);
    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self>;
}

macro_rules! int_codec {
    ($ty:ty, $add:ident, $get:ident) => {
        impl WireCodec for $ty {
            fn encode(&self, s: &mut Serializer) {
                s.$add(*self);
            }

            fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
                it.$get()
            }
        }
    };
}

int_codec!(u8, add_u8, get_u8);
int_codec!(u16, add_u16, get_u16);
int_codec!(u32, add_u32, get_u32);
int_codec!(u64, add_u64, get_u64);

macro_rules! hash_codec {
    ($ty:ty, $len:expr) => {
        impl WireCodec for $ty {
            fn encode(&self, s: &mut Serializer) {
                s.add_raw(self.as_bytes());
            }

            fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
                Ok(<$ty>::from_array(it.get_array::<$len>()?))
            }
        }
    };
}

hash_codec!(Hash128, 16);
hash_codec!(Hash160, 20);
hash_codec!(Hash256, 32);

impl WireCodec for Vec<u8> {
    fn encode(&self, s: &mut Serializer) {
        s.add_vl(self);
    }

    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
        Ok(it.get_vl()?.to_vec())
    }
}

impl WireCodec for AccountId {
    fn encode(&self, s: &mut Serializer) {
        s.add_vl(self.as_bytes());
    }

    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
        let raw = it.get_vl()?;
        if raw.len() != AccountId::LEN {
            return Err(CodecError::Malformed(format!(
                "account id must be {} bytes, got {}",
                AccountId::LEN,
                raw.len()
            )));
        }
        Ok(AccountId::from_slice(raw)?)
    }
}

impl WireCodec for Amount {
    fn encode(&self, s: &mut Serializer) {
        match self {
            Amount::Native { drops, negative } => {
                let mut v = *drops;
                if !negative {
                    v |= AMOUNT_POSITIVE;
                }
                s.add_u64(v);
            }
            Amount::Issued(iou) => {
                if iou.mantissa() == 0 {
                    s.add_u64(AMOUNT_NOT_NATIVE);
                } else {
                    let mut v = AMOUNT_NOT_NATIVE;
                    if !iou.is_negative() {
                        v |= AMOUNT_POSITIVE;
                    }
                    v |= ((iou.exponent() + AMOUNT_EXPONENT_BIAS) as u64) << 54;
                    v |= iou.mantissa();
                    s.add_u64(v);
                }
                s.add_raw(iou.currency().as_bytes());
                s.add_raw(iou.issuer().as_bytes());
            }
        }
    }

    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
        let v = it.get_u64()?;
        if v & AMOUNT_NOT_NATIVE == 0 {
            let negative = v & AMOUNT_POSITIVE == 0;
            return Ok(Amount::native_from_parts(v & !AMOUNT_POSITIVE, negative)?);
        }
        let currency = Currency::from_array(it.get_array::<20>()?);
        let issuer = AccountId::from_array(it.get_array::<20>()?);
        if currency.is_native() {
            return Err(CodecError::Malformed("issued amount with native currency".into()));
        }
        let value = v & !AMOUNT_NOT_NATIVE;
        if value == 0 {
            return Ok(Amount::issued(0, 0, false, currency, issuer)?);
        }
        let negative = value & AMOUNT_POSITIVE == 0;
        let exponent = ((value >> 54) & 0xFF) as i32 - AMOUNT_EXPONENT_BIAS;
        let mantissa = value & AMOUNT_MANTISSA_MASK;
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
            || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent)
        {
            return Err(CodecError::Malformed(format!(
                "non-canonical issued amount {mantissa}e{exponent}"
            )));
        }
        Ok(Amount::issued(mantissa, exponent, negative, currency, issuer)?)
    }
}

impl WireCodec for PathSet {
    fn encode(&self, s: &mut Serializer) {
        for (i, path) in self.paths().iter().enumerate() {
            if i > 0 {
                s.add_u8(PATH_BOUNDARY);
            }
            for hop in path {
                s.add_u8(hop.type_byte());
                if let Some(account) = hop.account() {
                    s.add_raw(account.as_bytes());
                }
                if let Some(currency) = hop.currency() {
                    s.add_raw(currency.as_bytes());
                }
                if let Some(issuer) = hop.issuer() {
                    s.add_raw(issuer.as_bytes());
                }
            }
        }
        s.add_u8(PATH_END);
    }

    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
        let mut set = PathSet::new();
        let mut path = Vec::new();
        loop {
            let t = it.get_u8()?;
            if t == PATH_END || t == PATH_BOUNDARY {
                if path.is_empty() {
                    if t == PATH_END && set.is_empty() {
                        break;
                    }
                    return Err(CodecError::Malformed("empty path in path set".into()));
                }
                set.push(std::mem::take(&mut path))?;
                if t == PATH_END {
                    break;
                }
                continue;
            }
            if t & !PathElement::TYPE_ALL != 0 {
                return Err(CodecError::Malformed(format!("unknown path element type {t:#04x}")));
            }
            let account = if t & PathElement::TYPE_ACCOUNT != 0 {
                Some(AccountId::from_array(it.get_array::<20>()?))
            } else {
                None
            };
            let currency = if t & PathElement::TYPE_CURRENCY != 0 {
                Some(Currency::from_array(it.get_array::<20>()?))
            } else {
                None
            };
            let issuer = if t & PathElement::TYPE_ISSUER != 0 {
                Some(AccountId::from_array(it.get_array::<20>()?))
            } else {
                None
            };
            path.push(PathElement::new(account, currency, issuer)?);
        }
        Ok(set)
    }
}

impl WireCodec for Vector256 {
    fn encode(&self, s: &mut Serializer) {
        let mut raw = Vec::with_capacity(self.len() * Hash256::LEN);
        for hash in self.iter() {
            raw.extend_from_slice(hash.as_bytes());
        }
        s.add_vl(&raw);
    }

    fn decode(it: &mut SerialIter<'_>) -> CodecResult<Self> {
        let raw = it.get_vl()?;
        if raw.len() % Hash256::LEN != 0 {
            return Err(CodecError::Malformed(format!(
                "vector256 payload of {} bytes is not a multiple of 32",
                raw.len()
            )));
        }
        raw.chunks_exact(Hash256::LEN)
            .map(|chunk| Hash256::from_slice(chunk).map_err(CodecError::from))
            .collect()
    }
}
