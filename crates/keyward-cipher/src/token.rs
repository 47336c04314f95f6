// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `<ivHex>:<cipherHex>` token codec.

use std::fmt;
use std::str::FromStr;

use keyward_core::CipherError;

/// IV length for AES-CBC.
pub const IV_LEN: usize = 16;

/// A parsed ciphertext token.
///
/// Parsing only checks the shape. Whether the ciphertext segment is a valid
/// CBC output is left to decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherToken {
    pub iv: [u8; IV_LEN],
    pub ciphertext: Vec<u8>,
}

impl CipherToken {
    pub fn new(iv: [u8; IV_LEN], ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }
}

impl fmt::Display for CipherToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for CipherToken {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (iv_hex, ct_hex) = s.split_once(':').ok_or(CipherError::MalformedToken)?;
        if iv_hex.is_empty() || ct_hex.is_empty() {
            return Err(CipherError::MalformedToken);
        }

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| CipherError::MalformedToken)?;
        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::MalformedToken)?;

        Ok(Self { iv, ciphertext })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IV_HEX: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn display_is_lowercase_hex_pair() {
        let token = CipherToken::new([0xAB; IV_LEN], vec![0xCD; 16]);
        let s = token.to_string();
        assert_eq!(s, format!("{}:{}", "ab".repeat(16), "cd".repeat(16)));
    }

    #[test]
    fn parses_well_formed_token() {
        let token: CipherToken = format!("{IV_HEX}:deadbeef").parse().unwrap();
        assert_eq!(token.iv[15], 0x0f);
        assert_eq!(token.ciphertext, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn accepts_uppercase_hex() {
        let token: CipherToken = format!("{}:DEADBEEF", IV_HEX.to_uppercase()).parse().unwrap();
        assert_eq!(token.ciphertext, vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn splits_on_first_colon_only() {
        let err = format!("{IV_HEX}:dead:beef").parse::<CipherToken>().unwrap_err();
        assert_eq!(err, CipherError::MalformedToken);
    }

    #[test]
    fn rejects_missing_halves() {
        for input in ["", "nodelimiter", ":", "abcd:", ":abcd"] {
            assert_eq!(
                input.parse::<CipherToken>().unwrap_err(),
                CipherError::MalformedToken,
                "input {input:?}"
            );
        }
    }

    #[test]
    fn rejects_wrong_iv_length() {
        let err = "0011:deadbeef".parse::<CipherToken>().unwrap_err();
        assert_eq!(err, CipherError::MalformedToken);
    }

    #[test]
    fn rejects_non_hex() {
        let err = format!("{IV_HEX}:zz").parse::<CipherToken>().unwrap_err();
        assert_eq!(err, CipherError::MalformedToken);
        let err = format!("{IV_HEX}:abc").parse::<CipherToken>().unwrap_err();
        assert_eq!(err, CipherError::MalformedToken);
    }
}
