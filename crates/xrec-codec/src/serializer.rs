use xrec_types::FieldId;

use crate::error::{CodecError, CodecResult};

/// Largest payload a VL prefix can describe.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Byte sink for the wire format.
///
/// Writes never fail at the call site. The first fault (capacity exceeded,
/// unencodable length, or one raised by the caller through
/// [`fail`](Self::fail)) is latched, later writes are ignored, and
/// [`finish`](Self::finish) reports it.
#[derive(Clone, Debug, Default)]
pub struct Serializer {
    buf: Vec<u8>,
    limit: Option<usize>,
    error: Option<CodecError>,
}

impl Serializer {
    /// Unbounded sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that faults once more than `limit` bytes are written.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit: Some(limit),
            error: None,
        }
    }

    pub fn add_u8(&mut self, v: u8) {
        self.put(&[v]);
    }

    pub fn add_u16(&mut self, v: u16) {
        self.put(&v.to_be_bytes());
    }

    pub fn add_u32(&mut self, v: u32) {
        self.put(&v.to_be_bytes());
    }

    pub fn add_u64(&mut self, v: u64) {
        self.put(&v.to_be_bytes());
    }

    /// Append bytes with no length prefix.
    pub fn add_raw(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// Append a VL length prefix followed by `bytes`.
    pub fn add_vl(&mut self, bytes: &[u8]) {
        match encode_vl_length(bytes.len()) {
            Ok((prefix, used)) => {
                self.put(&prefix[..used]);
                self.put(bytes);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Append a field header for `(type code, ordinal)`.
    ///
    /// Codes below 16 share a single byte; larger codes spill into
    /// following bytes.
    pub fn add_field_id(&mut self, type_code: u16, ordinal: u8) {
        let Ok(t) = u8::try_from(type_code) else {
            self.fail(CodecError::Malformed(format!("type code {type_code} does not fit a header")));
            return;
        };
        let f = ordinal;
        match (t < 16, f < 16) {
            (true, true) => self.put(&[(t << 4) | f]),
            (true, false) => self.put(&[t << 4, f]),
            (false, true) => self.put(&[f, t]),
            (false, false) => self.put(&[0, t, f]),
        }
    }

    /// Append the header of `field`.
    pub fn add_field_header(&mut self, field: &FieldId) {
        self.add_field_id(field.kind().code(), field.ordinal());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// The latched fault, if any.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    /// Consume the sink, returning the bytes or the first fault.
    pub fn finish(self) -> CodecResult<Vec<u8>> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.buf),
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        if self.error.is_some() {
            return;
        }
        if let Some(limit) = self.limit {
            if self.buf.len() + bytes.len() > limit {
                self.fail(CodecError::CapacityExceeded { limit });
                return;
            }
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Latch `error` as the sink's fault unless one is already set.
    pub fn fail(&mut self, error: CodecError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

/// Encode a VL length prefix. Returns the prefix buffer and how many of its
/// bytes are used.
pub fn encode_vl_length(len: usize) -> CodecResult<([u8; 3], usize)> {
    if len <= 192 {
        Ok(([len as u8, 0, 0], 1))
    } else if len <= 12_480 {
        let v = len - 193;
        Ok(([193 + (v >> 8) as u8, (v & 0xFF) as u8, 0], 2))
    } else if len <= MAX_VL_LENGTH {
        let v = len - 12_481;
        Ok((
            [241 + (v >> 16) as u8, ((v >> 8) & 0xFF) as u8, (v & 0xFF) as u8],
            3,
        ))
    } else {
        Err(CodecError::VlTooLong(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut s = Serializer::new();
        s.add_u16(0x0102);
        s.add_u32(0x0304_0506);
        s.add_u64(7);
        assert_eq!(
            s.finish().unwrap(),
            vec![1, 2, 3, 4, 5, 6, 0, 0, 0, 0, 0, 0, 0, 7]
        );
    }

    #[test]
    fn header_forms() {
        let mut s = Serializer::new();
        s.add_field_id(2, 4);
        s.add_field_id(2, 27);
        s.add_field_id(16, 3);
        s.add_field_id(17, 20);
        assert_eq!(s.finish().unwrap(), vec![0x24, 0x20, 27, 0x03, 16, 0x00, 17, 20]);
    }

    #[test]
    fn vl_length_boundaries() {
        assert_eq!(encode_vl_length(0).unwrap(), ([0, 0, 0], 1));
        assert_eq!(encode_vl_length(192).unwrap(), ([192, 0, 0], 1));
        assert_eq!(encode_vl_length(193).unwrap(), ([193, 0, 0], 2));
        assert_eq!(encode_vl_length(12_480).unwrap(), ([240, 255, 0], 2));
        assert_eq!(encode_vl_length(12_481).unwrap(), ([241, 0, 0], 3));
        assert_eq!(encode_vl_length(MAX_VL_LENGTH).unwrap(), ([254, 212, 23], 3));
        assert!(matches!(
            encode_vl_length(MAX_VL_LENGTH + 1),
            Err(CodecError::VlTooLong(_))
        ));
    }

    #[test]
    fn limit_is_sticky() {
        let mut s = Serializer::with_limit(3);
        s.add_u16(1);
        s.add_u16(2);
        s.add_u8(3);
        assert_eq!(s.len(), 2);
        assert_eq!(s.finish(), Err(CodecError::CapacityExceeded { limit: 3 }));
    }

    #[test]
    fn oversized_vl_fails_finish() {
        let mut s = Serializer::new();
        s.add_vl(&vec![0u8; MAX_VL_LENGTH + 1]);
        assert!(matches!(s.finish(), Err(CodecError::VlTooLong(_))));
    }

    #[test]
    fn first_caller_fault_wins() {
        let mut s = Serializer::new();
        s.add_u8(1);
        s.fail(CodecError::Unencodable("first".into()));
        s.fail(CodecError::Unencodable("second".into()));
        s.add_u8(2);
        assert_eq!(s.len(), 1);
        assert_eq!(s.finish(), Err(CodecError::Unencodable("first".into())));
    }
}
