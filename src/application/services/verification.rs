//! Signed, purpose-tagged email verification tokens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Purpose tag embedded in every verification token.
pub const EMAIL_VERIFICATION_PURPOSE: &str = "email-verification";

/// Lifetime of a verification token (24 hours).
pub const VERIFICATION_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    uid: i64,
    email: String,
    purpose: String,
    exp: i64,
}

/// Identity proven by a valid verification token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedEmail {
    pub user_id: i64,
    pub email: String,
}

/// Issues and checks verification tokens of the form
/// `base64url(claims).hex(hmac_sha256(base64url(claims)))`.
///
/// Tokens are stateless; nothing is stored server-side.
#[derive(Clone)]
pub struct VerificationSigner {
    secret: String,
}

impl VerificationSigner {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            AppError::internal("Invalid signing key", json!({ "reason": e.to_string() }))
        })
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, AppError> {
        self.issue_at(user_id, email, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            uid: user_id,
            email: email.to_string(),
            purpose: EMAIL_VERIFICATION_PURPOSE.to_string(),
            exp: (now + Duration::seconds(VERIFICATION_TOKEN_TTL_SECS)).timestamp(),
        };

        let payload = serde_json::to_vec(&claims).map_err(|e| {
            AppError::internal("Token encoding failed", json!({ "reason": e.to_string() }))
        })?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{encoded}.{signature}"))
    }

    pub fn verify(&self, token: &str) -> Result<VerifiedEmail, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Checks signature, purpose and expiry at `now`.
    ///
    /// # Errors
    ///
    /// Every rejection is [`AppError::Validation`] so callers answer 400.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedEmail, AppError> {
        let invalid = |reason: &str| {
            AppError::bad_request(
                "Invalid or expired verification token",
                json!({ "reason": reason }),
            )
        };

        let (encoded, signature) = token
            .trim()
            .split_once('.')
            .ok_or_else(|| invalid("malformed"))?;

        let signature = hex::decode(signature).map_err(|_| invalid("malformed signature"))?;

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("bad signature"))?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| invalid("malformed payload"))?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| invalid("malformed payload"))?;

        if claims.purpose != EMAIL_VERIFICATION_PURPOSE {
            return Err(invalid("wrong purpose"));
        }

        if now.timestamp() > claims.exp {
            return Err(invalid("expired"));
        }

        Ok(VerifiedEmail {
            user_id: claims.uid,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> VerificationSigner {
        VerificationSigner::new("test-verification-secret".to_string())
    }

    #[test]
    fn test_issue_then_verify() {
        let signer = signer();
        let token = signer.issue(42, "rani@example.com").unwrap();

        let verified = signer.verify(&token).unwrap();
        assert_eq!(verified.user_id, 42);
        assert_eq!(verified.email, "rani@example.com");
    }

    #[test]
    fn test_expires_after_24_hours() {
        let signer = signer();
        let issued = Utc::now();
        let token = signer.issue_at(1, "a@example.com", issued).unwrap();

        assert!(signer.verify_at(&token, issued + Duration::hours(23)).is_ok());

        let err = signer
            .verify_at(&token, issued + Duration::hours(24) + Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let token = signer.issue(1, "a@example.com").unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_claims = Claims {
            uid: 2,
            email: "a@example.com".to_string(),
            purpose: EMAIL_VERIFICATION_PURPOSE.to_string(),
            exp: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());

        assert!(signer.verify(&format!("{forged_payload}.{signature}")).is_err());
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = signer().issue(1, "a@example.com").unwrap();
        let other = VerificationSigner::new("different".to_string());
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_purpose_rejected() {
        let signer = signer();
        let claims = Claims {
            uid: 1,
            email: "a@example.com".to_string(),
            purpose: "password-reset".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let mut mac = signer.mac().unwrap();
        mac.update(encoded.as_bytes());
        let token = format!("{encoded}.{}", hex::encode(mac.finalize().into_bytes()));

        let err = signer.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = signer();
        assert!(signer.verify("").is_err());
        assert!(signer.verify("no-dot").is_err());
        assert!(signer.verify("abc.zz").is_err());
    }
}
