use crate::{VolumeIdError, volume_id::UuidFormat};

/// Capacity of the head cache, which always starts at offset 0.
pub const SB_BUFFER_SIZE: usize = 0x11000;
/// Capacity of the window cache used for everything past the head cache.
pub const SEEK_BUFFER_SIZE: usize = 0x10000;
/// Maximum length of a raw or normalized label.
pub const LABEL_SIZE: usize = 64;
/// Maximum length of a raw UUID or its formatted string.
pub const UUID_SIZE: usize = 36;

/// Fixed capacities shared by a [`ProbeState`](crate::ProbeState) and the
/// [`ProbeResult`](crate::ProbeResult)s filled from it.
///
/// # Fields
/// - `head_capacity`: size of the head cache; requests ending at or below it are
///   served from offset 0.
/// - `window_capacity`: size of the window cache and the largest request that can
///   be served past the head cache.
/// - `label_capacity`: bound on `label_raw` and `label`.
/// - `uuid_capacity`: bound on `uuid_raw` and `uuid`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProbeConfig {
    head_capacity: usize,
    window_capacity: usize,
    label_capacity: usize,
    uuid_capacity: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            head_capacity: SB_BUFFER_SIZE,
            window_capacity: SEEK_BUFFER_SIZE,
            label_capacity: LABEL_SIZE,
            uuid_capacity: UUID_SIZE,
        }
    }
}

impl ProbeConfig {
    /// Build a configuration from explicit capacities.
    ///
    /// # Errors
    /// Returns [`VolumeIdError::InvalidConfig`] if any capacity is zero or
    /// `uuid_capacity` cannot hold a 36 character UUID string.
    pub fn new(
        head_capacity: usize,
        window_capacity: usize,
        label_capacity: usize,
        uuid_capacity: usize,
    ) -> Result<ProbeConfig, VolumeIdError> {
        if head_capacity == 0 {
            return Err(VolumeIdError::InvalidConfig("head capacity must be non-zero"));
        }
        if window_capacity == 0 {
            return Err(VolumeIdError::InvalidConfig("window capacity must be non-zero"));
        }
        if label_capacity == 0 {
            return Err(VolumeIdError::InvalidConfig("label capacity must be non-zero"));
        }
        if uuid_capacity < UuidFormat::DceString.raw_len() {
            return Err(VolumeIdError::InvalidConfig(
                "uuid capacity must hold a 36 character UUID string",
            ));
        }

        return Ok(ProbeConfig {
            head_capacity,
            window_capacity,
            label_capacity,
            uuid_capacity,
        });
    }

    #[inline]
    pub fn head_capacity(&self) -> usize {
        return self.head_capacity;
    }

    #[inline]
    pub fn window_capacity(&self) -> usize {
        return self.window_capacity;
    }

    #[inline]
    pub fn label_capacity(&self) -> usize {
        return self.label_capacity;
    }

    #[inline]
    pub fn uuid_capacity(&self) -> usize {
        return self.uuid_capacity;
    }
}
