// ---------------------------------------------------------------------------
// file_header – Compression envelope with magic bytes, flags, and checksum
// ---------------------------------------------------------------------------
//
// Header format (20 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "TGSV"
//   [4..8]   Header format version (u32)
//   [8..12]  Flags (u32: bit 0 = LZ4-frame compressed)
//   [12..16] Uncompressed container size (u32)
//   [16..20] xxHash32 checksum of the payload (everything after the header)
//
// On save: encode container -> LZ4 frame -> prepend header (wrap_with_header)
// On load: check magic -> validate checksum -> decompress -> check size (unwrap_header)
// Headerless: if the first 4 bytes are not "TGSV", the input is treated as a
// bare LZ4 frame stream of at most MAX_BARE_FRAME_SIZE decompressed bytes.

use std::io::{Read, Write};

use lz4_flex::frame::{FrameDecoder, FrameEncoder, FrameInfo};
use tracing::debug;
use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a save file.
pub const MAGIC: [u8; 4] = *b"TGSV";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 20;

/// Current header layout version. Distinct from the engine version stored
/// inside the container.
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Flag bit: payload is an LZ4 frame.
pub const FLAG_COMPRESSED: u32 = 1;

/// Decompressed size limit for a headerless LZ4 frame, which carries no
/// declared size of its own.
pub const MAX_BARE_FRAME_SIZE: u64 = 256 * 1024 * 1024;

const XXHASH_SEED: u32 = 0;

/// Parsed file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub format_version: u32,
    pub flags: u32,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

impl FileHeader {
    pub fn is_compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&self.format_version.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }

    fn parse(bytes: &[u8]) -> Option<Self> {
        let field = |i: usize| -> Option<u32> {
            let raw: [u8; 4] = bytes.get(4 + i * 4..8 + i * 4)?.try_into().ok()?;
            Some(u32::from_le_bytes(raw))
        };
        Some(Self {
            format_version: field(0)?,
            flags: field(1)?,
            uncompressed_size: field(2)?,
            checksum: field(3)?,
        })
    }
}

/// Compress `data` into a single LZ4 frame with a content checksum.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, SaveError> {
    let info = FrameInfo::new().content_checksum(true);
    let mut encoder = FrameEncoder::with_frame_info(info, Vec::with_capacity(data.len() / 2));
    encoder.write_all(data)?;
    encoder.finish().map_err(|e| SaveError::Io(std::io::Error::other(e)))
}

/// Decompress an LZ4 frame stream, producing at most `limit` bytes.
///
/// Output past `limit` is never buffered: the stream is cut one byte after
/// the limit and reported as `CorruptContainer`.
pub fn decompress(payload: &[u8], limit: u64) -> Result<Vec<u8>, SaveError> {
    let mut out = Vec::new();
    FrameDecoder::new(payload)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)?;
    if out.len() as u64 > limit {
        return Err(SaveError::CorruptContainer(format!(
            "decompressed container exceeds {limit} bytes"
        )));
    }
    Ok(out)
}

/// Wrap container bytes in the envelope, optionally compressing them.
pub fn wrap_with_header(container: &[u8], compressed: bool) -> Result<Vec<u8>, SaveError> {
    let uncompressed_size = u32::try_from(container.len()).map_err(|_| {
        SaveError::Encode(format!(
            "container of {} bytes exceeds the 4 GiB file limit",
            container.len()
        ))
    })?;
    let payload = if compressed {
        compress(container)?
    } else {
        container.to_vec()
    };
    let header = FileHeader {
        format_version: HEADER_FORMAT_VERSION,
        flags: if compressed { FLAG_COMPRESSED } else { 0 },
        uncompressed_size,
        checksum: xxh32(&payload, XXHASH_SEED),
    };

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parse and validate the envelope, returning the raw container bytes.
///
/// # Errors
///
/// - `CorruptContainer` if the header is truncated, from a newer header
///   format, fails its checksum, or the size does not match after
///   decompression. Decompression stops as soon as the output outgrows the
///   declared size.
/// - `Io` if the LZ4 frame cannot be decompressed.
pub fn unwrap_header(bytes: &[u8]) -> Result<Vec<u8>, SaveError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        debug!("Save data has no envelope header; reading as bare LZ4 frame");
        return decompress(bytes, MAX_BARE_FRAME_SIZE);
    }

    let header = FileHeader::parse(bytes).ok_or_else(|| {
        SaveError::CorruptContainer(format!(
            "save file has magic bytes but is too short ({} bytes, need at least {})",
            bytes.len(),
            HEADER_SIZE
        ))
    })?;

    if header.format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::CorruptContainer(format!(
            "save file uses header format version {}, but this build only supports up to {}",
            header.format_version, HEADER_FORMAT_VERSION
        )));
    }

    let payload = &bytes[HEADER_SIZE..];
    let computed = xxh32(payload, XXHASH_SEED);
    if computed != header.checksum {
        return Err(SaveError::CorruptContainer(format!(
            "checksum mismatch (expected {:#010X}, got {:#010X})",
            header.checksum, computed
        )));
    }

    debug!(
        "Save file header: format v{}, flags {:#X}, container size {}, checksum {:#010X}",
        header.format_version, header.flags, header.uncompressed_size, header.checksum
    );

    let container = if header.is_compressed() {
        decompress(payload, u64::from(header.uncompressed_size))?
    } else {
        payload.to_vec()
    };

    if container.len() != header.uncompressed_size as usize {
        return Err(SaveError::CorruptContainer(format!(
            "container size mismatch (header says {}, got {})",
            header.uncompressed_size,
            container.len()
        )));
    }
    Ok(container)
}
