use core::fmt;

pub use fat_volume_id::{VolumeId32, VolumeId64};
use uuid::Uuid;

/// On-disk UUID encodings.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum UuidFormat {
    /// 32-bit little-endian serial, shown as `XXXX-XXXX`.
    Dos,
    /// 64-bit little-endian serial, shown as 16 uppercase hex digits.
    Ntfs,
    /// 64-bit big-endian serial, shown as 16 uppercase hex digits.
    Hfs,
    /// 16 byte RFC 4122 UUID.
    Dce,
    /// UUID stored as its 36 character text form.
    DceString,
}

impl UuidFormat {
    /// Number of raw bytes the format occupies on disk.
    pub const fn raw_len(self) -> usize {
        return match self {
            UuidFormat::Dos => 4,
            UuidFormat::Ntfs | UuidFormat::Hfs => 8,
            UuidFormat::Dce => 16,
            UuidFormat::DceString => 36,
        };
    }
}

/// A volume identifier decoded from its raw on-disk bytes.
///
/// The serial variants hold their bytes most significant first, so `Display`
/// renders them in uppercase hex the way the platform that wrote them does.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum VolumeUuid {
    Dos(VolumeId32),
    Ntfs(VolumeId64),
    Hfs(VolumeId64),
    Dce(Uuid),
    DceString(String),
}

impl VolumeUuid {
    /// Decode `raw` according to `format`.
    ///
    /// Returns `None` if `raw` is shorter than [`UuidFormat::raw_len`] or every
    /// byte is zero, which on disk means no identifier was set.
    pub fn from_raw(raw: &[u8], format: UuidFormat) -> Option<VolumeUuid> {
        let raw = raw.get(..format.raw_len())?;

        if raw.iter().all(|&b| b == 0) {
            return None;
        }

        let value = match format {
            UuidFormat::Dos => VolumeId32::from_bytes_be(raw.try_into().ok()?).into(),
            UuidFormat::Ntfs => VolumeUuid::Ntfs(VolumeId64::from_bytes_be(raw.try_into().ok()?)),
            // Already big-endian on disk, kept in stored order
            UuidFormat::Hfs => VolumeUuid::Hfs(VolumeId64::from_bytes(raw.try_into().ok()?)),
            UuidFormat::Dce => Uuid::from_slice(raw).ok()?.into(),
            UuidFormat::DceString => {
                let text = match raw.iter().position(|&b| b == 0) {
                    Some(nul) => &raw[..nul],
                    None => raw,
                };
                VolumeUuid::DceString(String::from_utf8_lossy(text).into_owned())
            }
        };

        return Some(value);
    }

    pub fn format(&self) -> UuidFormat {
        return match self {
            VolumeUuid::Dos(_) => UuidFormat::Dos,
            VolumeUuid::Ntfs(_) => UuidFormat::Ntfs,
            VolumeUuid::Hfs(_) => UuidFormat::Hfs,
            VolumeUuid::Dce(_) => UuidFormat::Dce,
            VolumeUuid::DceString(_) => UuidFormat::DceString,
        };
    }
}

impl From<Uuid> for VolumeUuid {
    fn from(value: Uuid) -> Self {
        return VolumeUuid::Dce(value);
    }
}

impl From<VolumeId32> for VolumeUuid {
    fn from(value: VolumeId32) -> Self {
        return VolumeUuid::Dos(value);
    }
}

impl fmt::Display for VolumeUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            Self::Dos(t) => write!(f, "{:X}", t.hyphenated()),
            Self::Ntfs(t) | Self::Hfs(t) => write!(f, "{t:X}"),
            Self::Dce(t) => write!(f, "{}", t.hyphenated()),
            Self::DceString(t) => write!(f, "{t}"),
        };
    }
}
