//! Little-endian, length-prefixed field I/O used by the container codec.

use std::io::{self, Read, Write};

/// Upper bound for a single length-prefixed field. Anything larger is
/// treated as corruption rather than an allocation request.
pub const MAX_FIELD_LEN: u32 = 1 << 30;

pub trait WriteFrameExt: Write {
    fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.write_all(&[v])
    }

    fn write_u32_le(&mut self, v: u32) -> io::Result<()> {
        self.write_all(&v.to_le_bytes())
    }

    fn write_len_prefixed(&mut self, bytes: &[u8]) -> io::Result<()> {
        let len = u32::try_from(bytes.len())
            .ok()
            .filter(|len| *len <= MAX_FIELD_LEN)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("field of {} bytes is too large to frame", bytes.len()),
                )
            })?;
        self.write_u32_le(len)?;
        self.write_all(bytes)
    }

    fn write_string(&mut self, s: &str) -> io::Result<()> {
        self.write_len_prefixed(s.as_bytes())
    }
}

impl<T: Write + ?Sized> WriteFrameExt for T {}

pub trait ReadFrameExt: Read {
    fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u32_le(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Read a u32 length followed by that many bytes.
    ///
    /// The buffer grows as bytes arrive, so a bogus length cannot force a
    /// large up-front allocation.
    fn read_len_prefixed(&mut self) -> io::Result<Vec<u8>> {
        let len = self.read_u32_le()?;
        if len > MAX_FIELD_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("field length {len} exceeds limit"),
            ));
        }
        let mut buf = Vec::new();
        Read::take(&mut *self, u64::from(len)).read_to_end(&mut buf)?;
        if buf.len() != len as usize {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("expected {len} bytes, got {}", buf.len()),
            ));
        }
        Ok(buf)
    }

    fn read_string(&mut self) -> io::Result<String> {
        let bytes = self.read_len_prefixed()?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<T: Read + ?Sized> ReadFrameExt for T {}
