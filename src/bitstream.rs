//! MSB-first bit streams over byte-oriented readers and writers
//!
//! Thin wrappers around `bitstream-io` that give the container code the
//! semantics it relies on: partially filled bytes are zero-padded on release,
//! and running out of input is reported as `None` rather than as an error.

use std::io::{self, ErrorKind, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitWrite};

/// Bit writer. Any partial byte is padded with zero bits when the writer is
/// finished or dropped, so the output is always a whole number of bytes.
pub struct BitWriter<W: Write> {
    inner: Option<bitstream_io::BitWriter<W, BigEndian>>,
}

impl<W: Write> BitWriter<W> {
    pub fn new(output: W) -> Self {
        Self {
            inner: Some(bitstream_io::BitWriter::endian(output, BigEndian)),
        }
    }

    fn inner(&mut self) -> io::Result<&mut bitstream_io::BitWriter<W, BigEndian>> {
        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "bit writer already finished"))
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner()?.write_bit(bit)
    }

    /// Write the low `bit_count` bits of `value`, most significant first.
    pub fn write_number(&mut self, value: u64, bit_count: u32) -> io::Result<()> {
        if bit_count == 0 {
            return Ok(());
        }
        if bit_count > u64::BITS {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot write {bit_count} bits from a 64-bit value"),
            ));
        }
        let masked = if bit_count == u64::BITS {
            value
        } else {
            value & ((1u64 << bit_count) - 1)
        };
        self.inner()?.write(bit_count, masked)
    }

    /// Write whole bytes. On an unaligned stream this is equivalent to
    /// writing each byte with `write_number(byte, 8)`.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner()?.write_bytes(bytes)
    }

    /// Pad the last byte with zeros, flush, and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        let inner = self.inner()?;
        inner.byte_align()?;
        inner.flush()?;
        let inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "bit writer already finished"))?;
        Ok(inner.into_writer())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            // errors cannot escape a destructor; use finish() to observe them
            let _ = inner.byte_align();
            let _ = inner.flush();
        }
    }
}

/// Bit reader, the dual of [`BitWriter`].
pub struct BitReader<R: Read> {
    inner: bitstream_io::BitReader<R, BigEndian>,
}

fn end_of_stream<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e),
    }
}

impl<R: Read> BitReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            inner: bitstream_io::BitReader::endian(input, BigEndian),
        }
    }

    /// Next bit, or `None` once the underlying stream has no more bytes.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        end_of_stream(self.inner.read_bit())
    }

    /// Read `bit_count` bits MSB-first. `None` means the stream ended before
    /// all bits were available; no partial value is returned.
    pub fn read_number(&mut self, bit_count: u32) -> io::Result<Option<u64>> {
        if bit_count == 0 {
            return Ok(Some(0));
        }
        if bit_count > u64::BITS {
            return Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("cannot read {bit_count} bits into a 64-bit value"),
            ));
        }
        end_of_stream(self.inner.read::<u64>(bit_count))
    }

    /// Fill `buf` completely. Returns `false` if the stream ended first.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<bool> {
        Ok(end_of_stream(self.inner.read_bytes(buf))?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_msb_first() {
        let mut out = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            for bit in [true, false, true, true, false, false, false, true] {
                writer.write_bit(bit).unwrap();
            }
        }
        assert_eq!(out, vec![0b1011_0001]);
    }

    #[test]
    fn test_drop_pads_partial_byte() {
        let mut out = Vec::new();
        {
            let mut writer = BitWriter::new(&mut out);
            writer.write_number(0b101, 3).unwrap();
        }
        assert_eq!(out, vec![0b1010_0000]);
    }

    #[test]
    fn test_finish_returns_sink() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_number(0x1FF, 9).unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(out, vec![0xFF, 0x80]);
    }

    #[test]
    fn test_write_number_keeps_low_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_number(0xABCD, 8).unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0xCD]);
    }

    #[test]
    fn test_zero_width_fields() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_number(u64::MAX, 0).unwrap();
        assert!(writer.finish().unwrap().is_empty());

        let mut reader = BitReader::new(&[][..]);
        assert_eq!(reader.read_number(0).unwrap(), Some(0));
    }

    #[test]
    fn test_read_number_spanning_bytes() {
        let data = [0b0000_0001, 0b1010_0000];
        let mut reader = BitReader::new(&data[..]);
        assert_eq!(reader.read_number(4).unwrap(), Some(0));
        assert_eq!(reader.read_number(7).unwrap(), Some(0b0001_101));
        assert_eq!(reader.read_bit().unwrap(), Some(false));
    }

    #[test]
    fn test_end_of_stream_is_none() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data[..]);
        assert_eq!(reader.read_number(8).unwrap(), Some(0xFF));
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_short_read_is_absent() {
        let data = [0xFF, 0xFF];
        let mut reader = BitReader::new(&data[..]);
        assert_eq!(reader.read_number(32).unwrap(), None);
    }

    #[test]
    fn test_unaligned_bytes_follow_bits() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bit(true).unwrap();
        writer.write_bytes(b"A").unwrap();
        let out = writer.finish().unwrap();
        assert_eq!(out, vec![0b1010_0000, 0b1000_0000]);

        let mut reader = BitReader::new(&out[..]);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        let mut byte = [0u8; 1];
        assert!(reader.read_bytes(&mut byte).unwrap());
        assert_eq!(&byte, b"A");
    }
}
