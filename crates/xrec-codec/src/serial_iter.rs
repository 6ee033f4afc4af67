use crate::error::{CodecError, CodecResult};

/// Forward-only cursor over wire bytes.
#[derive(Clone, Debug)]
pub struct SerialIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SerialIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn get_u8(&mut self) -> CodecResult<u8> {
        Ok(self.get_bytes(1)?[0])
    }

    pub fn get_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_be_bytes(self.get_array()?))
    }

    pub fn get_u32(&mut self) -> CodecResult<u32> {
        Ok(u32::from_be_bytes(self.get_array()?))
    }

    pub fn get_u64(&mut self) -> CodecResult<u64> {
        Ok(u64::from_be_bytes(self.get_array()?))
    }

    /// Read exactly `N` bytes into an array.
    pub fn get_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(N)?);
        Ok(out)
    }

    /// Borrow the next `n` bytes.
    pub fn get_bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let data: &'a [u8] = self.data;
        let start = self.pos;
        self.pos += n;
        Ok(&data[start..self.pos])
    }

    /// Read a VL length prefix.
    pub fn get_vl_length(&mut self) -> CodecResult<usize> {
        let b1 = self.get_u8()? as usize;
        if b1 <= 192 {
            return Ok(b1);
        }
        if b1 <= 240 {
            let b2 = self.get_u8()? as usize;
            return Ok(193 + (b1 - 193) * 256 + b2);
        }
        if b1 <= 254 {
            let b2 = self.get_u8()? as usize;
            let b3 = self.get_u8()? as usize;
            return Ok(12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3);
        }
        Err(CodecError::Malformed(format!("invalid VL length prefix byte {b1}")))
    }

    /// Read a VL-prefixed payload.
    pub fn get_vl(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.get_vl_length()?;
        self.get_bytes(len)
    }

    /// Read a field header, returning `(type code, ordinal)`.
    pub fn get_field_id(&mut self) -> CodecResult<(u16, u8)> {
        let first = self.get_u8()?;
        let mut type_code = u16::from(first >> 4);
        let mut ordinal = first & 0x0F;
        if type_code == 0 {
            type_code = u16::from(self.get_u8()?);
            if type_code < 16 {
                return Err(CodecError::Malformed(format!(
                    "uncommon type code {type_code} out of range"
                )));
            }
        }
        if ordinal == 0 {
            ordinal = self.get_u8()?;
            if ordinal < 16 {
                return Err(CodecError::Malformed(format!(
                    "uncommon field ordinal {ordinal} out of range"
                )));
            }
        }
        Ok((type_code, ordinal))
    }
}
