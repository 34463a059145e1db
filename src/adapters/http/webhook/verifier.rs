//! Webhook authenticity checks.
//!
//! - WhatsApp signs each delivery with `X-Hub-Signature-256:
//!   sha256=<hex HMAC-SHA256 of the raw body, keyed with the app secret>`.
//! - Telegram echoes the `secret_token` given to `setWebhook` in
//!   `X-Telegram-Bot-Api-Secret-Token`.
//!
//! All comparisons are constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the WhatsApp payload signature.
pub const WHATSAPP_SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Header carrying the Telegram secret token.
pub const TELEGRAM_SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

const SIGNATURE_PREFIX: &str = "sha256=";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Missing signature header")]
    Missing,

    #[error("Malformed signature header")]
    Malformed,

    #[error("Signature does not match payload")]
    Mismatch,

    #[error("Invalid signing key")]
    InvalidKey,
}

/// Verifies a WhatsApp `X-Hub-Signature-256` header against the raw body.
pub fn verify_hub_signature(
    app_secret: &str,
    payload: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let provided = header
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
        .ok_or(SignatureError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    if expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() != 1 {
        return Err(SignatureError::Mismatch);
    }
    Ok(())
}

/// Computes the `X-Hub-Signature-256` header value for a payload.
pub fn hub_signature(app_secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;
    mac.update(payload);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Constant-time equality of two shared secrets.
pub fn secrets_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "app-secret";
    const BODY: &[u8] = br#"{"object":"whatsapp_business_account","entry":[]}"#;

    #[test]
    fn valid_signature_is_accepted() {
        let header = hub_signature(SECRET, BODY).unwrap();
        assert!(verify_hub_signature(SECRET, BODY, Some(&header)).is_ok());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let header = hub_signature(SECRET, BODY).unwrap();
        assert_eq!(
            verify_hub_signature(SECRET, b"{}", Some(&header)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let header = hub_signature("other", BODY).unwrap();
        assert_eq!(
            verify_hub_signature(SECRET, BODY, Some(&header)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn missing_and_malformed_headers() {
        assert_eq!(verify_hub_signature(SECRET, BODY, None), Err(SignatureError::Missing));
        assert_eq!(
            verify_hub_signature(SECRET, BODY, Some("md5=abc")),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_hub_signature(SECRET, BODY, Some("sha256=not-hex")),
            Err(SignatureError::Malformed)
        );
    }

    #[test]
    fn truncated_signature_is_a_mismatch() {
        let header = hub_signature(SECRET, BODY).unwrap();
        let truncated = &header[..header.len() - 2];
        assert_eq!(
            verify_hub_signature(SECRET, BODY, Some(truncated)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn secrets_match_requires_exact_equality() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cret", "s3cre"));
        assert!(!secrets_match("s3cret", "S3CRET"));
    }
}
