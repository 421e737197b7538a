// Byte-level cursor over packet buffers.
//
// The reader borrows the caller's buffer for the duration of one decode and
// tracks an offset; any read past the end is an underrun error, never partial
// data. The writer appends to a growable buffer and cannot fail.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};

pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(ProtocolError::Underrun {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16le(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16le(&mut self) -> Result<i16> {
        Ok(self.read_u16le()? as i16)
    }

    pub fn read_u32le(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32le(&mut self) -> Result<i32> {
        Ok(self.read_u32le()? as i32)
    }

    pub fn read_u64le(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    pub fn read_i64le(&mut self) -> Result<i64> {
        Ok(self.read_u64le()? as i64)
    }

    pub fn read_f32le(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32le()?))
    }

    pub fn read_f64le(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64le()?))
    }
}

#[derive(Default)]
pub struct ByteWriter {
    buf: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.put_i8(v);
    }

    pub fn write_u16le(&mut self, v: u16) {
        self.buf.put_u16_le(v);
    }

    pub fn write_i16le(&mut self, v: i16) {
        self.buf.put_i16_le(v);
    }

    pub fn write_u32le(&mut self, v: u32) {
        self.buf.put_u32_le(v);
    }

    pub fn write_i32le(&mut self, v: i32) {
        self.buf.put_i32_le(v);
    }

    pub fn write_u64le(&mut self, v: u64) {
        self.buf.put_u64_le(v);
    }

    pub fn write_i64le(&mut self, v: i64) {
        self.buf.put_i64_le(v);
    }

    pub fn write_f32le(&mut self, v: f32) {
        self.buf.put_f32_le(v);
    }

    pub fn write_f64le(&mut self, v: f64) {
        self.buf.put_f64_le(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_roundtrip() {
        let mut w = ByteWriter::new();
        w.write_u8(0xab);
        w.write_i16le(-2);
        w.write_i32le(-70000);
        w.write_i64le(i64::MIN);
        w.write_f32le(1.5);
        w.write_f64le(-0.25);
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 0xab);
        assert_eq!(r.read_i16le().unwrap(), -2);
        assert_eq!(r.read_i32le().unwrap(), -70000);
        assert_eq!(r.read_i64le().unwrap(), i64::MIN);
        assert_eq!(r.read_f32le().unwrap(), 1.5);
        assert_eq!(r.read_f64le().unwrap(), -0.25);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut w = ByteWriter::new();
        w.write_u32le(0x0403_0201);
        assert_eq!(w.as_slice(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_underrun_reports_sizes() {
        let data = [0u8; 3];
        let mut r = ByteReader::new(&data);
        r.read_u8().unwrap();
        match r.read_u32le() {
            Err(ProtocolError::Underrun {
                offset,
                needed,
                remaining,
            }) => {
                assert_eq!(offset, 1);
                assert_eq!(needed, 4);
                assert_eq!(remaining, 2);
            }
            other => panic!("expected underrun, got {:?}", other.map(|_| ())),
        }
        // A failed read consumes nothing.
        assert_eq!(r.position(), 1);
    }
}
