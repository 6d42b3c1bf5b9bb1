//! This library computes the 6-digit, 30-second, HMAC-SHA1 TOTP codes used by mainstream
//! authenticator apps, from a base32 shared secret. The `totp-clip` binary built on top of it
//! puts the current code on the system clipboard.
//!
//! Only the parameters every authenticator app agrees on are supported: `SHA1`, 6 digits and
//! a 30 seconds step, as per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-4).
//!
//! # Examples
//!
//! ```rust
//! use totp_clip::{Secret, TOTP};
//!
//! let secret = Secret::Encoded("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".to_string());
//! let totp = TOTP::new(secret.to_bytes().unwrap()).unwrap();
//! let token = totp.generate(59_000).unwrap();
//! assert_eq!(token.code, "287082");
//! assert_eq!(token.remaining_seconds, 1);
//! ```
//!
//! ```rust
//! let key = totp_clip::secret::decode("jbswy3dpehpk3pxp").unwrap();
//! let token = totp_clip::generate(&key, 1_700_000_000_000).unwrap();
//! println!("{} ({}s left)", token.code, token.remaining_seconds);
//! ```

pub mod cli;
mod error;
pub mod host;
pub mod options;
pub mod secret;

pub use error::TotpError;
pub use options::Options;
pub use secret::{Secret, SecretParseError};

use constant_time_eq::constant_time_eq;

use core::fmt;

use hmac::Mac;

type HmacSha1 = hmac::Hmac<sha1::Sha1>;

/// Duration in seconds of a step.
pub const STEP: u64 = 30;

/// Number of digits composing a code.
pub const DIGITS: usize = 6;

const MODULUS: u32 = 1_000_000;

/// Number of elapsed steps since the Unix epoch, given a timestamp in milliseconds.
pub fn counter(time_millis: u64) -> u64 {
    time_millis / 1000 / STEP
}

/// Seconds left before the code valid at `time_millis` changes, in `1..=30`.
pub fn remaining_seconds(time_millis: u64) -> u64 {
    STEP - (time_millis / 1000) % STEP
}

/// Render a truncated value as exactly [DIGITS] digits, left padded with zeros.
pub fn format_code(value: u32) -> String {
    format!("{:0width$}", value % MODULUS, width = DIGITS)
}

/// Compute the code for a raw key at the given timestamp in milliseconds.
///
/// # Errors
///
/// Will return [TotpError::Crypto] if the key is empty.
pub fn generate(key: &[u8], time_millis: u64) -> Result<Token, TotpError> {
    TOTP::new(key)?.generate(time_millis)
}

/// A generated code and how long it stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Exactly [DIGITS] decimal digits.
    pub code: String,
    /// Seconds before the next step, in `1..=30`.
    pub remaining_seconds: u64,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// TOTP holds the key used to generate an auth code and validate it. Its [secret](struct.TOTP.html#structfield.secret) field is sensitive data, treat it accordingly
#[derive(Debug, Clone)]
pub struct TOTP<T = Vec<u8>> {
    /// non-encoded value
    pub secret: T,
}

impl<T: AsRef<[u8]>> PartialEq for TOTP<T> {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl<T> fmt::Display for TOTP<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digits: {}; step: {}; alg: SHA1", DIGITS, STEP)
    }
}

impl TOTP<Vec<u8>> {
    /// Will create a new instance of TOTP from a base32 encoded secret
    ///
    /// ```rust
    /// use totp_clip::TOTP;
    /// let totp = TOTP::from_base32("OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG").unwrap();
    /// assert_eq!(totp.secret.len(), 23);
    /// ```
    ///
    /// # Errors
    ///
    /// Will return [TotpError::InvalidInput] if the secret isn't base32 and
    /// [TotpError::Crypto] if it decodes to no bytes at all.
    pub fn from_base32(secret: &str) -> Result<TOTP<Vec<u8>>, TotpError> {
        TOTP::new(secret::decode(secret)?)
    }
}

impl<T: AsRef<[u8]>> TOTP<T> {
    /// Will create a new instance of TOTP with the given non-encoded key
    ///
    /// # Errors
    ///
    /// Will return [TotpError::Crypto] if the key is empty
    pub fn new(secret: T) -> Result<TOTP<T>, TotpError> {
        if secret.as_ref().is_empty() {
            return Err(TotpError::Crypto("key is empty".to_string()));
        }
        Ok(TOTP { secret })
    }

    /// Will sign the step containing the given timestamp in milliseconds
    pub fn sign(&self, time_millis: u64) -> Result<Vec<u8>, TotpError> {
        let mut mac = HmacSha1::new_from_slice(self.secret.as_ref())
            .map_err(|e| TotpError::Crypto(e.to_string()))?;
        mac.update(&counter(time_millis).to_be_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Will generate a token given the provided timestamp in milliseconds
    pub fn generate(&self, time_millis: u64) -> Result<Token, TotpError> {
        let hash = self.sign(time_millis)?;
        let value = dynamic_truncation(&hash);
        log::debug!("counter {} truncated to {}", counter(time_millis), value);
        Ok(Token {
            code: format_code(value),
            remaining_seconds: remaining_seconds(time_millis),
        })
    }

    /// Returns the timestamp in seconds of the first second of the next step
    /// given the provided timestamp in milliseconds
    pub fn next_step(&self, time_millis: u64) -> u64 {
        (counter(time_millis) + 1) * STEP
    }

    /// Give the ttl (in seconds) of the token generated at the provided timestamp in milliseconds
    pub fn ttl(&self, time_millis: u64) -> u64 {
        remaining_seconds(time_millis)
    }

    /// Will check if token is the one valid at the provided timestamp in milliseconds
    pub fn check(&self, token: &str, time_millis: u64) -> Result<bool, TotpError> {
        let expected = self.generate(time_millis)?;
        Ok(constant_time_eq(expected.code.as_bytes(), token.as_bytes()))
    }

    /// Will return the base32 representation of the secret, which might be useful when users want to manually add the secret to their authenticator
    pub fn get_secret_base32(&self) -> String {
        base32::encode(
            base32::Alphabet::Rfc4648 { padding: false },
            self.secret.as_ref(),
        )
    }
}

// Dynamic truncation, rfc-4226 section 5.3: the low nibble of the last byte picks 4 bytes,
// read big endian with the sign bit cleared.
fn dynamic_truncation(hash: &[u8]) -> u32 {
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    let value = (hash[offset] as u32) << 24
        | (hash[offset + 1] as u32) << 16
        | (hash[offset + 2] as u32) << 8
        | hash[offset + 3] as u32;
    value & 0x7fff_ffff
}
