// ---------------------------------------------------------------------------
// container_codec – versioned save container framing
// ---------------------------------------------------------------------------
//
// Layout (before the compression envelope, little-endian):
//   [magic "GDAT"] [major u32] [minor u32] [patch u32] [build u32]
//   [snapshot: u32 len + bytes]
//   repeat {
//     [DELEGATE_START u8]
//     [name] [display name] [type key]        (u32 len + UTF-8 each)
//     [DELEGATE_DATA u8] [state: u32 len + bytes]   only if the delegate has state
//   }
//   [DELEGATE_LIST_END u8]
//
// Markers are single tag bytes and names are always length-prefixed, so a
// delegate name can never be mistaken for a marker. The END marker is the
// only way the delegate list terminates; running out of bytes first is
// corruption.

use std::io::{self, Cursor, Read, Write};

use simulation::{Delegate, Version};

use crate::frame_io::{ReadFrameExt, WriteFrameExt};
use crate::save_error::SaveError;

/// Magic bytes opening the version header.
pub const CONTAINER_MAGIC: [u8; 4] = *b"GDAT";

/// Structural markers of the delegate section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Marker {
    DelegateStart = 0xD1,
    DelegateData = 0xD2,
    DelegateListEnd = 0xDF,
}

impl Marker {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0xD1 => Some(Marker::DelegateStart),
            0xD2 => Some(Marker::DelegateData),
            0xDF => Some(Marker::DelegateListEnd),
            _ => None,
        }
    }
}

/// Persisted form of one delegate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateState {
    pub name: String,
    pub display_name: String,
    pub type_key: String,
    /// `None` when the delegate carries no state; no data section is written.
    pub state: Option<Vec<u8>>,
}

impl DelegateState {
    /// Take a delegate's identity and current state.
    pub fn capture(delegate: &dyn Delegate) -> Self {
        Self {
            name: delegate.name().to_string(),
            display_name: delegate.display_name().to_string(),
            type_key: delegate.type_key().to_string(),
            state: delegate.save_state(),
        }
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }
}

/// Decoded (uncompressed) save container.
///
/// Only exists transiently while a save is encoded or a load is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub version: Version,
    pub snapshot: Vec<u8>,
    pub delegates: Vec<DelegateState>,
}

impl Container {
    /// Encode to a complete in-memory buffer. Nothing is written anywhere
    /// unless the whole container encodes.
    pub fn encode(&self) -> Result<Vec<u8>, SaveError> {
        let mut out = Vec::with_capacity(64 + self.snapshot.len());
        self.write_to(&mut out)
            .map_err(|e| SaveError::Encode(e.to_string()))?;
        Ok(out)
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&CONTAINER_MAGIC)?;
        w.write_u32_le(self.version.major)?;
        w.write_u32_le(self.version.minor)?;
        w.write_u32_le(self.version.patch)?;
        w.write_u32_le(self.version.build)?;

        w.write_len_prefixed(&self.snapshot)?;

        for delegate in &self.delegates {
            w.write_u8(Marker::DelegateStart as u8)?;
            w.write_string(&delegate.name)?;
            w.write_string(&delegate.display_name)?;
            w.write_string(&delegate.type_key)?;
            if let Some(state) = &delegate.state {
                w.write_u8(Marker::DelegateData as u8)?;
                w.write_len_prefixed(state)?;
            }
        }
        w.write_u8(Marker::DelegateListEnd as u8)
    }

    /// Decode a whole container in one go.
    pub fn decode(bytes: &[u8]) -> Result<Self, SaveError> {
        let mut reader = ContainerReader::new(Cursor::new(bytes));
        let version = reader.read_version()?;
        let snapshot = reader.read_snapshot()?;
        let delegates = reader.read_delegates()?;
        reader.finish()?;
        Ok(Self {
            version,
            snapshot,
            delegates,
        })
    }
}

fn corrupt(context: &str, e: io::Error) -> SaveError {
    SaveError::CorruptContainer(format!("{context}: {e}"))
}

/// Staged container reader.
///
/// Sections must be read in stream order: [`read_version`], then
/// [`read_snapshot`], then [`read_delegates`], then [`finish`]. This lets a
/// caller decide whether to continue after seeing only the version header.
///
/// [`read_version`]: ContainerReader::read_version
/// [`read_snapshot`]: ContainerReader::read_snapshot
/// [`read_delegates`]: ContainerReader::read_delegates
/// [`finish`]: ContainerReader::finish
pub struct ContainerReader<R> {
    inner: R,
}

impl<R: Read> ContainerReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_version(&mut self) -> Result<Version, SaveError> {
        let mut magic = [0u8; 4];
        self.inner
            .read_exact(&mut magic)
            .map_err(|e| corrupt("missing version header", e))?;
        if magic != CONTAINER_MAGIC {
            return Err(SaveError::CorruptContainer(format!(
                "version header has bad magic {magic:02X?}"
            )));
        }
        let mut components = [0u32; 4];
        for c in components.iter_mut() {
            *c = self
                .inner
                .read_u32_le()
                .map_err(|e| corrupt("truncated version header", e))?;
        }
        let [major, minor, patch, build] = components;
        Ok(Version::new(major, minor, patch, build))
    }

    pub fn read_snapshot(&mut self) -> Result<Vec<u8>, SaveError> {
        self.inner
            .read_len_prefixed()
            .map_err(|e| corrupt("snapshot block", e))
    }

    pub fn read_delegates(&mut self) -> Result<Vec<DelegateState>, SaveError> {
        let mut delegates: Vec<DelegateState> = Vec::new();
        let mut marker = self.read_marker()?;
        loop {
            match marker {
                Marker::DelegateListEnd => break,
                Marker::DelegateStart => {}
                Marker::DelegateData => {
                    return Err(SaveError::CorruptContainer(
                        "delegate data marker outside of a delegate entry".to_string(),
                    ));
                }
            }

            let name = self.read_field("delegate name")?;
            let display_name = self.read_field("delegate display name")?;
            let type_key = self.read_field("delegate type")?;

            // The marker after an entry is either its data section or the
            // next entry's leading marker; in the latter case it is carried
            // into the next iteration unconsumed.
            marker = self.read_marker()?;
            let state = if marker == Marker::DelegateData {
                let blob = self
                    .inner
                    .read_len_prefixed()
                    .map_err(|e| corrupt(&format!("state of delegate {name}"), e))?;
                marker = self.read_marker()?;
                Some(blob)
            } else {
                None
            };

            if delegates.iter().any(|d| d.name == name) {
                return Err(SaveError::CorruptContainer(format!(
                    "duplicate delegate name {name}"
                )));
            }
            delegates.push(DelegateState {
                name,
                display_name,
                type_key,
                state,
            });
        }
        Ok(delegates)
    }

    /// Verify that nothing follows the END marker.
    pub fn finish(mut self) -> Result<(), SaveError> {
        let mut probe = [0u8; 1];
        match self.inner.read(&mut probe) {
            Ok(0) => Ok(()),
            Ok(_) => Err(SaveError::CorruptContainer(
                "unexpected bytes after delegate list end".to_string(),
            )),
            Err(e) => Err(corrupt("reading container tail", e)),
        }
    }

    fn read_marker(&mut self) -> Result<Marker, SaveError> {
        let byte = self
            .inner
            .read_u8()
            .map_err(|e| corrupt("delegate list ended without end marker", e))?;
        Marker::from_u8(byte).ok_or_else(|| {
            SaveError::CorruptContainer(format!("unknown marker byte {byte:#04X}"))
        })
    }

    fn read_field(&mut self, what: &str) -> Result<String, SaveError> {
        self.inner.read_string().map_err(|e| corrupt(what, e))
    }
}
