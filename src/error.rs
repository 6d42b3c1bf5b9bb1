use crate::SecretParseError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TotpError {
    InvalidInput(SecretParseError),
    Crypto(String),
    Clipboard(String),
}

impl std::error::Error for TotpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TotpError::InvalidInput(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for TotpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotpError::InvalidInput(e) => write!(f, "Secret is not valid base32. {}", e),
            TotpError::Crypto(reason) => write!(f, "Could not compute HMAC-SHA1: {}", reason),
            TotpError::Clipboard(reason) => {
                write!(f, "Could not write to the clipboard: {}", reason)
            }
        }
    }
}

impl From<SecretParseError> for TotpError {
    fn from(e: SecretParseError) -> Self {
        TotpError::InvalidInput(e)
    }
}
