use alloy_primitives::{hex, B256};

use crate::{ActionsError, Result};

/// Length of a 65-byte signature rendered as `0x`-prefixed hex
pub const SIGNATURE_HEX_LENGTH: usize = 132;

/// The `(v, r, s)` components of a 65-byte ECDSA signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSignature {
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

/// Splits a `0x`-prefixed 65-byte hex signature into `r` (first 32 bytes),
/// `s` (next 32 bytes) and `v` (last byte).
///
/// # Errors
///
/// Returns [`ActionsError::InvalidSignatureFormat`] unless the input is
/// exactly 132 characters of `0x`-prefixed hex.
pub fn split_signature(signature: &str) -> Result<SplitSignature> {
    let invalid = || ActionsError::InvalidSignatureFormat {
        length: signature.len(),
    };

    if signature.len() != SIGNATURE_HEX_LENGTH {
        return Err(invalid());
    }

    let digits = signature.strip_prefix("0x").ok_or_else(invalid)?;
    let bytes: [u8; 65] = hex::decode_to_array(digits).map_err(|_| invalid())?;

    Ok(SplitSignature {
        r: B256::from_slice(&bytes[..32]),
        s: B256::from_slice(&bytes[32..64]),
        v: bytes[64],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SIGNATURE: &str = "0x\
        1111111111111111111111111111111111111111111111111111111111111111\
        2222222222222222222222222222222222222222222222222222222222222222\
        1b";

    #[test]
    fn test_split_valid_signature() {
        let split = split_signature(SIGNATURE).unwrap();

        assert_eq!(split.r, B256::repeat_byte(0x11));
        assert_eq!(split.s, B256::repeat_byte(0x22));
        assert_eq!(split.v, 27);
    }

    #[rstest]
    #[case::too_short("0x12345678")]
    #[case::empty("")]
    #[case::missing_v(&SIGNATURE[..130])]
    fn test_split_rejects_wrong_length(#[case] signature: &str) {
        let result = split_signature(signature);
        assert!(matches!(
            result,
            Err(ActionsError::InvalidSignatureFormat { length }) if length == signature.len()
        ));
    }

    #[test]
    fn test_split_rejects_non_hex() {
        let signature = format!("0x{}", "zz".repeat(65));
        assert!(matches!(
            split_signature(&signature),
            Err(ActionsError::InvalidSignatureFormat { length: 132 })
        ));
    }

    #[test]
    fn test_split_rejects_missing_prefix() {
        let signature = "ab".repeat(66);
        assert!(matches!(
            split_signature(&signature),
            Err(ActionsError::InvalidSignatureFormat { length: 132 })
        ));
    }
}
