//! Byte-level save codec: bitcode encoding, lz4 compression, and the
//! checksummed file header.

use crate::file_header;
use crate::save_error::SaveError;
use crate::save_types::{SaveFile, SAVE_VERSION};

pub fn encode(file: &SaveFile) -> Vec<u8> {
    let raw = bitcode::encode(file);
    let compressed = lz4_flex::compress_prepend_size(&raw);
    file_header::wrap_with_header(&compressed)
}

pub fn decode(bytes: &[u8]) -> Result<SaveFile, SaveError> {
    let payload = file_header::unwrap_header(bytes)?;
    let raw = lz4_flex::decompress_size_prepended(payload)
        .map_err(|e| SaveError::Decode(e.to_string()))?;
    let file: SaveFile = bitcode::decode(&raw)?;
    if file.version > SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected_max: SAVE_VERSION,
            found: file.version,
        });
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save_types::PlacedObjectData;
    use simulation::inventory::ResourceKind;

    fn sample() -> SaveFile {
        SaveFile {
            version: SAVE_VERSION,
            inventory: vec![(ResourceKind::Plank, 7)],
            placed: vec![
                PlacedObjectData {
                    def_name: "Plank Bridge".to_string(),
                    position: [0.5, 0.0, 0.5],
                    facing: 0,
                },
                PlacedObjectData {
                    def_name: "Oak Stool".to_string(),
                    position: [0.5, 0.0, 0.5],
                    facing: 2,
                },
            ],
        }
    }

    #[test]
    fn test_codec_round_trip() {
        let file = sample();
        let bytes = encode(&file);
        assert_eq!(decode(&bytes).unwrap(), file);
    }

    #[test]
    fn test_flipped_byte_is_detected() {
        let mut bytes = encode(&sample());
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn test_newer_save_version_refused() {
        let mut file = sample();
        file.version = SAVE_VERSION + 3;
        let bytes = encode(&file);
        assert!(matches!(
            decode(&bytes),
            Err(SaveError::VersionMismatch { found, .. }) if found == SAVE_VERSION + 3
        ));
    }

    #[test]
    fn test_garbage_input_refused() {
        assert!(decode(b"definitely not a save").is_err());
        assert!(decode(b"").is_err());
    }
}
