//! Representation of a secret either a "raw" \[u8\] or "base 32" encoded String
//!
//! # Examples
//!
//! - Decode a base32 secret as handed out by an authenticator setup page
//! ```
//! use totp_clip::secret::decode;
//!
//! let key = decode("JBSWY3DPEHPK3PXP").unwrap();
//! assert_eq!(key, b"Hello!\xde\xad\xbe\xef");
//! ```
//!
//! - Move between the raw and encoded forms
//! ```
//! use totp_clip::Secret;
//!
//! let secret = Secret::Raw(b"12345678901234567890".to_vec());
//! assert_eq!(
//!     secret.to_encoded(),
//!     Secret::Encoded("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".to_string())
//! );
//! ```

use base32::{self, Alphabet};

use constant_time_eq::constant_time_eq;

/// RFC 4648 base32 alphabet, without the padding symbol.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const INVALID: u8 = 0xff;

/// ASCII to 5-bit value, `INVALID` for anything outside the alphabet.
static DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Different ways secret parsing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParseError {
    /// A character outside of `A-Z2-7` (case-insensitive). Padding `=` lands here too.
    InvalidCharacter(char),
}

impl std::error::Error for SecretParseError {}

impl std::fmt::Display for SecretParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretParseError::InvalidCharacter(c) => {
                write!(f, "Invalid base-32 character: {:?}", c)
            }
        }
    }
}

/// Decode an unpadded base32 string into raw bytes.
///
/// Input is upper-cased first, with ASCII case folding only: letters such as `ı` or `ſ`,
/// which fold to `I` and `S` under full Unicode rules, are rejected. Every 5-bit group is
/// pushed into a bit buffer and a byte is emitted each time 8 bits are available; trailing
/// bits that don't fill a byte are dropped.
///
/// # Errors
///
/// Will return [SecretParseError::InvalidCharacter] on the first character not in [ALPHABET].
pub fn decode(secret: &str) -> Result<Vec<u8>, SecretParseError> {
    let mut out = Vec::with_capacity(secret.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for c in secret.chars() {
        let value = lookup(c.to_ascii_uppercase()).ok_or_else(|| {
            log::warn!("rejecting secret: {:?} is not a base32 character", c);
            SecretParseError::InvalidCharacter(c)
        })?;
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
            // only the bits not yet emitted are kept
            buffer &= (1 << bits) - 1;
        }
    }

    log::trace!("decoded {} bytes, dropped {} trailing bits", out.len(), bits);
    Ok(out)
}

fn lookup(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match DECODE_TABLE[c as usize] {
        INVALID => None,
        value => Some(value),
    }
}

/// Shared secret between client and server to generate token from.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret.
    Encoded(String),
}

impl PartialEq for Secret {
    /// Will check that to_bytes() returns the same.
    /// One secret can be Raw, and the other Encoded.
    /// A secret that fails to decode is never equal to anything.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(a), Ok(b)) => constant_time_eq(&a, &b),
            _ => false,
        }
    }
}

impl Secret {
    /// Get the inner value as a Vec of bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SecretParseError> {
        match self {
            Secret::Raw(s) => Ok(s.to_vec()),
            Secret::Encoded(s) => decode(s),
        }
    }

    /// Try to transform a `Secret::Encoded` into a `Secret::Raw`
    pub fn to_raw(&self) -> Result<Self, SecretParseError> {
        match self {
            Secret::Raw(_) => Ok(self.clone()),
            Secret::Encoded(s) => decode(s).map(Secret::Raw),
        }
    }

    /// Transforms a `Secret::Raw` into an unpadded `Secret::Encoded`.
    pub fn to_encoded(&self) -> Self {
        match self {
            Secret::Raw(s) => {
                Secret::Encoded(base32::encode(Alphabet::Rfc4648 { padding: false }, s))
            }
            Secret::Encoded(_) => self.clone(),
        }
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Raw(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Secret::Encoded(s) => write!(f, "{}", s),
        }
    }
}
