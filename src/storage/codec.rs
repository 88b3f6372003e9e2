//! Blob encoding for numeric sequences
//!
//! Layout (version 1):
//!
//! ```text
//! [0]      format version (u8)
//! [1..9]   element count (u64, little-endian)
//! [9..]    count x f64 (little-endian)
//! ```

use crate::{Error, Result};

pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = 1 + 8;
const VALUE_LEN: usize = std::mem::size_of::<f64>();

/// Encode a sequence of doubles into a versioned, length-prefixed blob.
pub fn encode(values: &[f64]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(HEADER_LEN + values.len() * VALUE_LEN);
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&(values.len() as u64).to_le_bytes());
    blob.extend(values.iter().flat_map(|v| v.to_le_bytes()));
    blob
}

/// Decode a blob produced by [`encode`].
pub fn decode(blob: &[u8]) -> Result<Vec<f64>> {
    if blob.len() < HEADER_LEN {
        return Err(Error::Codec(format!("blob too short for header ({} bytes)", blob.len())));
    }

    let (header, body) = blob.split_at(HEADER_LEN);
    if header[0] != FORMAT_VERSION {
        return Err(Error::Codec(format!("unsupported blob format version {}", header[0])));
    }

    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&header[1..]);
    let count = u64::from_le_bytes(count_bytes) as usize;

    if body.len() / VALUE_LEN != count || body.len() % VALUE_LEN != 0 {
        return Err(Error::Codec(format!(
            "blob declares {} values but carries {} bytes",
            count,
            body.len()
        )));
    }

    Ok(body
        .chunks_exact(VALUE_LEN)
        .map(|chunk| {
            let mut bytes = [0u8; VALUE_LEN];
            bytes.copy_from_slice(chunk);
            f64::from_le_bytes(bytes)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let blob = encode(&[1.0, -1.0]);
        assert_eq!(blob.len(), 9 + 16);
        assert_eq!(blob[0], FORMAT_VERSION);
        assert_eq!(&blob[1..9], &2u64.to_le_bytes());
        assert_eq!(&blob[9..17], &1.0f64.to_le_bytes());
    }

    #[test]
    fn test_decode_values() {
        let values = vec![2.725, 9.375, 18.75, 37.5, 75.0, 150.0, 225.0, 300.0, 500.0, 1000.0];
        assert_eq!(decode(&encode(&values)).unwrap(), values);
        assert!(decode(&encode(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_blobs() {
        assert!(matches!(decode(&[]), Err(Error::Codec(_))));

        let mut wrong_version = encode(&[1.0]);
        wrong_version[0] = 7;
        assert!(matches!(decode(&wrong_version), Err(Error::Codec(_))));

        let mut truncated = encode(&[1.0, 2.0]);
        truncated.truncate(truncated.len() - 3);
        assert!(matches!(decode(&truncated), Err(Error::Codec(_))));

        // A raw array of doubles without a header is not accepted
        let raw: Vec<u8> = [1.0f64, 2.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert!(decode(&raw).is_err());
    }
}
