// Packet capture log.
//
// Records raw packet bytes with direction, protocol id and timestamp for
// offline inspection. Entries are bincode-serialized and framed with a u32
// (little-endian) length so a reader can walk the file back. This is debug
// tooling around the codec; it never sits on a decode or encode path.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketDirection {
    Clientbound,
    Serverbound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEntry {
    pub timestamp: i64,
    pub direction: PacketDirection,
    pub protocol_id: u32,
    pub data: Vec<u8>,
}

pub struct CaptureLog {
    session_id: Uuid,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    protocol_id: u32,
}

impl CaptureLog {
    /// Opens a new capture file under `dir`, named by a fresh session id.
    pub fn create(dir: impl AsRef<Path>, protocol_id: u32) -> io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let session_id = Uuid::new_v4();
        let path = dir.join(format!("{}.bin", session_id));
        let writer = BufWriter::new(File::create(&path)?);

        info!(%session_id, path = %path.display(), protocol_id, "capture session started");

        Ok(Self {
            session_id,
            path,
            writer: Some(writer),
            protocol_id,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_packet(&mut self, direction: PacketDirection, data: Vec<u8>) -> io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            let entry = CaptureEntry {
                timestamp: Utc::now().timestamp_millis(),
                direction,
                protocol_id: self.protocol_id,
                data,
            };

            let serialized = bincode::serialize(&entry)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

            // Length first so the reader can frame entries back out.
            let len = serialized.len() as u32;
            writer.write_all(&len.to_le_bytes())?;
            writer.write_all(&serialized)?;
            writer.flush()?;

            debug!(bytes = serialized.len(), ?direction, "capture entry written");
        }

        Ok(())
    }
}

impl Drop for CaptureLog {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}

/// Replays a capture file. A frame that runs past the end of the file means
/// the log was truncated mid-write and fails the read.
pub fn read_entries(path: impl AsRef<Path>) -> io::Result<Vec<CaptureEntry>> {
    let data = std::fs::read(path)?;
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        if data.len() - offset < 4 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "truncated capture frame length",
            ));
        }
        let len = u32::from_le_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as usize;
        offset += 4;

        if data.len() - offset < len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "capture frame of {} bytes with only {} remaining",
                    len,
                    data.len() - offset
                ),
            ));
        }
        let entry: CaptureEntry = bincode::deserialize(&data[offset..offset + len])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        entries.push(entry);
        offset += len;
    }

    Ok(entries)
}
