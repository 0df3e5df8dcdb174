// ---------------------------------------------------------------------------
// file_header – save file header with magic bytes, version, and checksum
// ---------------------------------------------------------------------------
//
// Header format (16 bytes, fixed-size, little-endian):
//   [0..4]   Magic bytes: "HSTD"
//   [4..8]   Header format version (u32)
//   [8..12]  Payload size in bytes (u32)
//   [12..16] xxHash32 checksum of the payload (everything after the header)
//
// On save: encode + compress the payload, then prepend the header.
// On load: check magic -> validate version -> validate checksum -> payload.

use xxhash_rust::xxh32::xxh32;

use crate::save_error::SaveError;

/// Magic bytes identifying a Hearthstead save file.
pub const MAGIC: [u8; 4] = *b"HSTD";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Current header format version. Distinct from the SaveFile version (which
/// tracks schema changes); this tracks the header layout itself.
pub const HEADER_FORMAT_VERSION: u32 = 1;

const XXHASH_SEED: u32 = 0;

/// Wrap a payload with the file header.
pub fn wrap_with_header(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&HEADER_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&xxh32(payload, XXHASH_SEED).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Parse and validate the header, returning the payload slice.
pub fn unwrap_header(bytes: &[u8]) -> Result<&[u8], SaveError> {
    if bytes.len() < HEADER_SIZE || bytes[..4] != MAGIC {
        return Err(SaveError::Decode(
            "not a Hearthstead save file (bad magic)".to_string(),
        ));
    }

    let format_version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if format_version > HEADER_FORMAT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: HEADER_FORMAT_VERSION,
            found: format_version,
        });
    }

    let payload_size = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    let checksum = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() != payload_size {
        return Err(SaveError::Decode(format!(
            "payload is {} bytes but header declares {}",
            payload.len(),
            payload_size
        )));
    }

    let actual = xxh32(payload, XXHASH_SEED);
    if actual != checksum {
        return Err(SaveError::ChecksumMismatch {
            expected: checksum,
            found: actual,
        });
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_unwrap_round_trip() {
        let payload = b"hello homestead";
        let wrapped = wrap_with_header(payload);
        assert_eq!(wrapped.len(), HEADER_SIZE + payload.len());
        assert_eq!(unwrap_header(&wrapped).unwrap(), payload);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut wrapped = wrap_with_header(b"data");
        wrapped[0] = b'X';
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::Decode(_))
        ));
    }

    #[test]
    fn test_truncated_file_rejected() {
        let wrapped = wrap_with_header(b"data");
        assert!(unwrap_header(&wrapped[..HEADER_SIZE - 2]).is_err());
        assert!(unwrap_header(&wrapped[..wrapped.len() - 1]).is_err());
    }

    #[test]
    fn test_corrupted_payload_fails_checksum() {
        let mut wrapped = wrap_with_header(b"precious data");
        let last = wrapped.len() - 1;
        wrapped[last] ^= 0xFF;
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_newer_header_version_rejected() {
        let mut wrapped = wrap_with_header(b"data");
        wrapped[4..8].copy_from_slice(&(HEADER_FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            unwrap_header(&wrapped),
            Err(SaveError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let wrapped = wrap_with_header(b"");
        assert_eq!(unwrap_header(&wrapped).unwrap(), b"");
    }
}
