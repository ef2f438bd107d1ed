use std::{
    fmt,
    io::{Error as IoError, ErrorKind as IoErrorKind, Read, Seek, SeekFrom},
};

use zerocopy::FromBytes;

use crate::{VolumeIdError, config::ProbeConfig};

/// Represents a probe session on a byte source.
///
/// A [`ProbeState`] reads through the source on behalf of filesystem parsers and
/// keeps two caches so that repeated lookups of superblock fields do not hit the
/// source again:
///
/// - the head cache holds bytes `[0, head_len)` and serves every request that
///   ends within [`ProbeConfig::head_capacity`]. It only grows, and each growth
///   re-reads the source from offset 0.
/// - the window cache holds one contiguous range `[window_offset,
///   window_offset + window_len)` anywhere else in the source. A request outside
///   that range replaces it entirely.
///
/// Both caches are allocated on first use and freed by
/// [`ProbeState::release_buffers`] or when the state is dropped.
///
/// The source is held by value. A caller that wants to keep ownership of a
/// [`File`](std::fs::File) can pass `&mut file` instead, or take the source back
/// with [`ProbeState::into_inner`].
pub struct ProbeState<R> {
    source: R,
    config: ProbeConfig,

    head: Vec<u8>,
    head_len: usize,

    window: Vec<u8>,
    window_offset: u64,
    window_len: usize,
}

impl<R: Read + Seek> ProbeState<R> {
    /// Create a probe state with the default [`ProbeConfig`].
    pub fn new(source: R) -> ProbeState<R> {
        return ProbeState::with_config(source, ProbeConfig::default());
    }

    /// Create a probe state with custom cache capacities.
    pub fn with_config(source: R, config: ProbeConfig) -> ProbeState<R> {
        return ProbeState {
            source,
            config,
            head: Vec::new(),
            head_len: 0,
            window: Vec::new(),
            window_offset: 0,
            window_len: 0,
        };
    }

    /// Return `len` bytes of the source starting at `offset`.
    ///
    /// The returned slice borrows from one of the caches and is valid until the
    /// next call on this state.
    ///
    /// # Errors
    /// Returns [`VolumeIdError::NotAvailable`] if:
    /// - the source could not be seeked or read,
    /// - the source ended before `offset + len`,
    /// - `len` is larger than [`ProbeConfig::window_capacity`] and the range does
    ///   not fit the head cache,
    /// - a cache buffer could not be allocated.
    pub fn get_bytes(&mut self, offset: u64, len: usize) -> Result<&[u8], VolumeIdError> {
        log::debug!("get_bytes - OFFSET: {offset:#x}({offset}), LEN: {len:#x}");

        let head_capacity = self.config.head_capacity() as u64;

        match offset.checked_add(len as u64) {
            Some(end) if end <= head_capacity => {
                return self.head_bytes(offset as usize, end as usize);
            }
            _ => return self.window_bytes(offset, len),
        }
    }

    /// Map `size_of::<T>()` bytes at `offset` onto `T`.
    ///
    /// # Errors
    /// Returns [`VolumeIdError::NotAvailable`] if the bytes cannot be read.
    pub fn read_as<T: FromBytes>(&mut self, offset: u64) -> Result<T, VolumeIdError> {
        let bytes = self.get_bytes(offset, core::mem::size_of::<T>())?;

        return T::read_from_bytes(bytes).map_err(|_| VolumeIdError::NotAvailable);
    }

    /// Return the 512 byte sector `sector`.
    pub fn read_sector(&mut self, sector: u64) -> Result<&[u8], VolumeIdError> {
        let offset = sector.checked_mul(512).ok_or(VolumeIdError::NotAvailable)?;

        return self.get_bytes(offset, 512);
    }

    fn head_bytes(&mut self, offset: usize, end: usize) -> Result<&[u8], VolumeIdError> {
        if self.head.is_empty() {
            self.head = alloc_buffer(self.config.head_capacity())?;
        }

        if end > self.head_len {
            log::debug!("head_bytes - READ HEAD LEN: {end:#x}");

            if let Err(e) = self.source.seek(SeekFrom::Start(0)) {
                log::debug!("head_bytes - SEEK FAILED: {e}");
                return Err(VolumeIdError::NotAvailable);
            }

            match read_full(&mut self.source, &mut self.head[..end]) {
                Ok(count) => {
                    log::debug!("head_bytes - GOT: {count:#x}({count}) bytes");
                    self.head_len = count;
                    if count < end {
                        return Err(VolumeIdError::NotAvailable);
                    }
                }
                Err(e) => {
                    log::debug!("head_bytes - READ FAILED: {e}");
                    self.head_len = 0;
                    return Err(VolumeIdError::NotAvailable);
                }
            }
        }

        return Ok(&self.head[offset..end]);
    }

    fn window_bytes(&mut self, offset: u64, len: usize) -> Result<&[u8], VolumeIdError> {
        let capacity = self.config.window_capacity();

        if len > capacity {
            log::debug!("window_bytes - WINDOW TOO SMALL: {capacity:#x} < {len:#x}");
            return Err(VolumeIdError::NotAvailable);
        }

        let end = offset
            .checked_add(len as u64)
            .ok_or(VolumeIdError::NotAvailable)?;

        if self.window.is_empty() {
            self.window = alloc_buffer(capacity)?;
        }

        let window_end = self.window_offset.saturating_add(self.window_len as u64);

        if offset < self.window_offset || end > window_end {
            log::debug!("window_bytes - READ WINDOW OFFSET: {offset:#x}, LEN: {capacity:#x}");

            if let Err(e) = self.source.seek(SeekFrom::Start(offset)) {
                log::debug!("window_bytes - SEEK FAILED: {e}");
                return Err(VolumeIdError::NotAvailable);
            }

            self.window_offset = offset;

            match read_full(&mut self.source, &mut self.window) {
                Ok(count) => {
                    log::debug!("window_bytes - GOT: {count:#x}({count}) bytes");
                    self.window_len = count;
                    if count < len {
                        log::debug!(
                            "window_bytes - requested {len:#x} bytes, got only {count:#x} bytes"
                        );
                        return Err(VolumeIdError::NotAvailable);
                    }
                }
                Err(e) => {
                    log::debug!("window_bytes - READ FAILED: {e}");
                    self.window_len = 0;
                    return Err(VolumeIdError::NotAvailable);
                }
            }
        }

        let start = (offset - self.window_offset) as usize;

        return Ok(&self.window[start..start + len]);
    }
}

impl<R> ProbeState<R> {
    /// Free both caches and forget what they held.
    ///
    /// The next [`ProbeState::get_bytes`] behaves as on a fresh state. Calling
    /// this when no cache is allocated does nothing.
    pub fn release_buffers(&mut self) {
        self.head = Vec::new();
        self.head_len = 0;
        self.window = Vec::new();
        self.window_offset = 0;
        self.window_len = 0;
    }

    /// Returns the capacities this state was created with.
    #[inline]
    pub fn config(&self) -> &ProbeConfig {
        return &self.config;
    }

    /// Returns how many bytes from offset 0 the head cache currently holds.
    #[inline]
    pub fn head_len(&self) -> usize {
        return self.head_len;
    }

    /// Returns the byte range currently held by the window cache.
    #[inline]
    pub fn window_range(&self) -> core::ops::Range<u64> {
        return self.window_offset..self.window_offset.saturating_add(self.window_len as u64);
    }

    /// Returns if either cache buffer is allocated.
    #[inline]
    pub fn is_buffered(&self) -> bool {
        return !self.head.is_empty() || !self.window.is_empty();
    }

    #[inline]
    pub fn get_ref(&self) -> &R {
        return &self.source;
    }

    /// Direct access to the source. Reads made through it bypass the caches.
    #[inline]
    pub fn get_mut(&mut self) -> &mut R {
        return &mut self.source;
    }

    /// Drop the caches and return the source.
    pub fn into_inner(self) -> R {
        return self.source;
    }
}

impl<R> fmt::Debug for ProbeState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f
            .debug_struct("ProbeState")
            .field("config", &self.config)
            .field("head_len", &self.head_len)
            .field("window_offset", &self.window_offset)
            .field("window_len", &self.window_len)
            .finish_non_exhaustive();
    }
}

fn alloc_buffer(capacity: usize) -> Result<Vec<u8>, VolumeIdError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| VolumeIdError::NotAvailable)?;
    buffer.resize(capacity, 0);

    return Ok(buffer);
}

/// Read until `buf` is full or the source reports end of file.
///
/// Returns the number of bytes read, which is less than `buf.len()` only at
/// end of file.
fn read_full<R: Read>(source: &mut R, mut buf: &mut [u8]) -> Result<usize, IoError> {
    let mut count = 0;

    while !buf.is_empty() {
        match source.read(buf) {
            Ok(0) => break,
            Ok(n) => {
                count += n;
                buf = &mut buf[n..];
            }
            Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    return Ok(count);
}
