use std::{borrow::Cow, fmt};

use crate::{
    config::ProbeConfig,
    util::{Endianness, decode_ucs2_from, trim_label},
    volume_id::{UuidFormat, VolumeUuid},
};

/// What a probed region is used for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum UsageType {
    Filesystem,
    PartitionTable,
    Raid,
    DiskLabel,
    Crypto,
    Other,
    Unprobed,
    Unused,
}

impl UsageType {
    /// The usage tag reported for this kind.
    pub const fn as_str(self) -> &'static str {
        return match self {
            UsageType::Filesystem => "filesystem",
            UsageType::PartitionTable => "partitiontable",
            UsageType::Raid => "raid",
            UsageType::DiskLabel => "disklabel",
            UsageType::Crypto => "crypto",
            UsageType::Other => "other",
            UsageType::Unprobed => "unprobed",
            UsageType::Unused => "unused",
        };
    }
}

impl fmt::Display for UsageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}", self.as_str());
    }
}

/// One entry of a partition table found by a parser.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct PartitionResult {
    usage: Option<UsageType>,
    offset: u64,
    size: u64,
    type_raw: Vec<u8>,
}

impl PartitionResult {
    pub fn new(offset: u64, size: u64) -> PartitionResult {
        return PartitionResult {
            offset,
            size,
            ..Default::default()
        };
    }

    pub fn set_usage(&mut self, usage: UsageType) {
        self.usage = Some(usage);
    }

    /// Keep the raw partition type field, e.g. the MBR type byte or a GPT type GUID.
    pub fn set_type_raw(&mut self, raw: &[u8]) {
        self.type_raw = raw.to_vec();
    }

    pub fn usage(&self) -> Option<UsageType> {
        return self.usage;
    }

    pub fn usage_str(&self) -> Option<&'static str> {
        return self.usage.map(UsageType::as_str);
    }

    pub fn offset(&self) -> u64 {
        return self.offset;
    }

    pub fn size(&self) -> u64 {
        return self.size;
    }

    pub fn type_raw(&self) -> &[u8] {
        return &self.type_raw;
    }
}

/// Identifiers collected for one filesystem or partition table.
///
/// Parsers fill it through the `set_*` methods with bytes fetched from a
/// [`ProbeState`](crate::ProbeState). Every field is bounded by the capacities
/// of the [`ProbeConfig`] it was created with; longer input is cut at the
/// capacity.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ProbeResult {
    label_capacity: usize,
    uuid_capacity: usize,

    usage: Option<UsageType>,
    type_name: Option<&'static str>,
    type_version: Option<String>,

    label_raw: Vec<u8>,
    label: Vec<u8>,

    uuid_raw: Vec<u8>,
    uuid: String,
    uuid_value: Option<VolumeUuid>,

    partitions: Vec<PartitionResult>,
}

impl Default for ProbeResult {
    fn default() -> Self {
        return ProbeResult::with_config(&ProbeConfig::default());
    }
}

impl ProbeResult {
    pub fn new() -> ProbeResult {
        return ProbeResult::default();
    }

    pub fn with_config(config: &ProbeConfig) -> ProbeResult {
        return ProbeResult {
            label_capacity: config.label_capacity(),
            uuid_capacity: config.uuid_capacity(),
            usage: None,
            type_name: None,
            type_version: None,
            label_raw: Vec::new(),
            label: Vec::new(),
            uuid_raw: Vec::new(),
            uuid: String::new(),
            uuid_value: None,
            partitions: Vec::new(),
        };
    }

    pub fn set_usage(&mut self, usage: UsageType) {
        self.usage = Some(usage);
    }

    /// Record the filesystem type tag and, if known, its version.
    pub fn set_type(&mut self, name: &'static str, version: Option<&str>) {
        self.type_name = Some(name);
        self.type_version = version.map(str::to_string);
    }

    /// Store the label bytes exactly as found on disk.
    pub fn set_label_raw(&mut self, buf: &[u8]) {
        let buf = clamp(buf, self.label_capacity, "set_label_raw");
        self.label_raw = buf.to_vec();
    }

    /// Store a byte string label, cut at the first NUL and without trailing
    /// whitespace. Leading whitespace is kept.
    pub fn set_label(&mut self, buf: &[u8]) {
        let buf = clamp(buf, self.label_capacity, "set_label");
        self.label = trim_label(buf).to_vec();
    }

    /// Store a label encoded as 16-bit code units, transcoded to UTF-8.
    ///
    /// The label ends at the first zero unit. Units are not paired, so a
    /// surrogate is stored as its own 3 byte sequence.
    pub fn set_label_utf16(&mut self, buf: &[u8], endian: Endianness) {
        self.label = decode_ucs2_from(buf, endian, self.label_capacity);
    }

    /// Store the raw UUID bytes and their formatted string.
    ///
    /// `buf` must hold at least [`UuidFormat::raw_len`] bytes, only that many
    /// are used. An all-zero UUID is stored raw but leaves the string empty.
    /// A shorter `buf` clears both.
    pub fn set_uuid(&mut self, buf: &[u8], format: UuidFormat) {
        let count = format.raw_len();

        let Some(raw) = buf.get(..count) else {
            log::warn!(
                "set_uuid - {format:?} needs {count} bytes, got {}",
                buf.len()
            );
            self.uuid_raw.clear();
            self.uuid.clear();
            self.uuid_value = None;
            return;
        };

        self.uuid_raw = raw.to_vec();
        self.uuid_value = VolumeUuid::from_raw(raw, format);
        self.uuid = match &self.uuid_value {
            Some(value) => {
                let mut text = value.to_string();
                if text.len() > self.uuid_capacity {
                    // Only a DceString with multi-byte replacement characters gets here
                    let mut end = self.uuid_capacity;
                    while !text.is_char_boundary(end) {
                        end -= 1;
                    }
                    text.truncate(end);
                }
                text
            }
            None => String::new(),
        };
    }

    pub fn add_partition(&mut self, partition: PartitionResult) {
        self.partitions.push(partition);
    }

    pub fn usage(&self) -> Option<UsageType> {
        return self.usage;
    }

    /// Returns the usage tag, e.g. `"filesystem"`.
    pub fn usage_str(&self) -> Option<&'static str> {
        return self.usage.map(UsageType::as_str);
    }

    pub fn type_name(&self) -> Option<&'static str> {
        return self.type_name;
    }

    pub fn type_version(&self) -> Option<&str> {
        return self.type_version.as_deref();
    }

    pub fn label_raw(&self) -> &[u8] {
        return &self.label_raw;
    }

    /// Returns the normalized label bytes.
    pub fn label_bytes(&self) -> &[u8] {
        return &self.label;
    }

    /// Returns the normalized label if it is valid UTF-8.
    pub fn label(&self) -> Option<&str> {
        return core::str::from_utf8(&self.label).ok();
    }

    pub fn label_lossy(&self) -> Cow<'_, str> {
        return String::from_utf8_lossy(&self.label);
    }

    pub fn uuid_raw(&self) -> &[u8] {
        return &self.uuid_raw;
    }

    /// Returns the formatted UUID, empty if none was set or it was all zero.
    pub fn uuid(&self) -> &str {
        return &self.uuid;
    }

    pub fn uuid_value(&self) -> Option<&VolumeUuid> {
        return self.uuid_value.as_ref();
    }

    pub fn partitions(&self) -> &[PartitionResult] {
        return &self.partitions;
    }

    pub fn partitions_mut(&mut self) -> &mut [PartitionResult] {
        return &mut self.partitions;
    }
}

fn clamp<'a>(buf: &'a [u8], capacity: usize, caller: &str) -> &'a [u8] {
    if buf.len() > capacity {
        log::warn!("{caller} - {} bytes cut to {capacity}", buf.len());
        return &buf[..capacity];
    }
    return buf;
}
