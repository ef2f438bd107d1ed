#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Endianness {
    Little,
    Big,
}

/// Whitespace as the C locale `isspace` defines it.
#[inline]
pub fn is_space(byte: u8) -> bool {
    return matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r');
}

/// Cut `bytes` at the first NUL, then drop trailing whitespace.
pub fn trim_label(bytes: &[u8]) -> &[u8] {
    let bytes = match bytes.iter().position(|&b| b == 0) {
        Some(nul) => &bytes[..nul],
        None => bytes,
    };

    let end = bytes
        .iter()
        .rposition(|&b| !is_space(b))
        .map_or(0, |last| last + 1);

    return &bytes[..end];
}

/// Transcode 16-bit code units to UTF-8, writing at most `capacity` bytes.
///
/// Every unit is encoded on its own, so surrogates come out as 3 byte sequences
/// rather than being paired. A zero unit ends the string, and so does a unit
/// whose encoding would not fit in `capacity`. An odd trailing byte is ignored.
pub fn decode_ucs2_from(bytes: &[u8], endian: Endianness, capacity: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(capacity.min(bytes.len() / 2 * 3));

    for chunk in bytes.chunks_exact(2) {
        let c = match endian {
            Endianness::Little => u16::from_le_bytes([chunk[0], chunk[1]]),
            Endianness::Big => u16::from_be_bytes([chunk[0], chunk[1]]),
        };

        let mut buf = [0u8; 3];
        let seq: &[u8] = if c == 0 {
            break;
        } else if c < 0x80 {
            buf[0] = c as u8;
            &buf[..1]
        } else if c < 0x800 {
            buf[0] = 0xc0 | (c >> 6) as u8;
            buf[1] = 0x80 | (c & 0x3f) as u8;
            &buf[..2]
        } else {
            buf[0] = 0xe0 | (c >> 12) as u8;
            buf[1] = 0x80 | ((c >> 6) & 0x3f) as u8;
            buf[2] = 0x80 | (c & 0x3f) as u8;
            &buf[..3]
        };

        if out.len() + seq.len() > capacity {
            log::warn!("decode_ucs2_from - label truncated at {} bytes", out.len());
            break;
        }
        out.extend_from_slice(seq);
    }

    return out;
}
