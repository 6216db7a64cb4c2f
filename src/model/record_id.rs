use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use derive_more::Display;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use uuid::Uuid;

/// Opaque 12-byte record identifier, rendered as 24 lowercase hex characters.
///
/// Layout follows the usual document-store object id: 4 bytes of big-endian unix seconds,
/// 5 random bytes fixed per process, then a 3 byte counter. Ids generated by one process are
/// therefore ordered by creation time.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId([u8; 12]);

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let random = Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&random.as_bytes()[..5]);
    bytes
});

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| {
    let random = Uuid::new_v4();
    let b = random.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, 0, b[0], b[1]]))
});

#[derive(Debug, Display, PartialEq, Eq)]
#[display(fmt = "invalid record id: {}", _0)]
pub struct RecordIdError(String);

impl std::error::Error for RecordIdError {}

impl RecordId {
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default();
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn parse(hex: &str) -> Result<Self, RecordIdError> {
        if hex.len() != 24 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RecordIdError(hex.to_string()));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| RecordIdError(hex.to_string()))?;
        }
        Ok(Self(bytes))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self)
    }
}

impl FromStr for RecordId {
    type Err = RecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = RecordIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RecordId::parse(&s).map_err(de::Error::custom)
    }
}
