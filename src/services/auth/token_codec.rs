use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};

// Errors returned by bearer-token verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    SignatureInvalid,
    Expired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::SignatureInvalid => write!(f, "token signature does not verify"),
            Self::Expired => write!(f, "token has expired"),
        }
    }
}

impl StdError for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            // A token signed for a different algorithm cannot verify against our key.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::SignatureInvalid,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid verification key: {0}")]
pub struct InvalidKey(String);

/// Key material the codec verifies against.
///
/// - `HmacSecret`: HS256 shared secret
/// - `Ed25519PublicPem`: EdDSA public key (SPKI PEM)
#[derive(Clone)]
pub enum VerificationKey {
    HmacSecret(Vec<u8>),
    Ed25519PublicPem(String),
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::HmacSecret(_) => f.write_str("HmacSecret(..)"),
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
        }
    }
}

impl VerificationKey {
    fn decoding_key(&self) -> Result<(DecodingKey, Algorithm), InvalidKey> {
        match self {
            Self::HmacSecret(secret) => {
                if secret.is_empty() {
                    return Err(InvalidKey("empty hmac secret".to_string()));
                }
                Ok((DecodingKey::from_secret(secret), Algorithm::HS256))
            }
            Self::Ed25519PublicPem(pem) => {
                let key = DecodingKey::from_ed_pem(pem.as_bytes())
                    .map_err(|e| InvalidKey(format!("ed25519 public key pem: {}", e)))?;
                Ok((key, Algorithm::EdDSA))
            }
        }
    }
}

/// Claims we read from the token. Anything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: String,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
}

/// What a successfully verified token tells us. `subject` is not resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub issued_at: Option<i64>,
    pub expires_at: i64,
}

/// Stateless bearer-token verifier. Safe to share between requests.
#[derive(Clone)]
pub struct TokenCodec {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(key: &VerificationKey, leeway_seconds: u64) -> Result<Self, InvalidKey> {
        let (decoding_key, algorithm) = key.decoding_key()?;

        let mut validation = Validation::new(algorithm);
        // Expiry is checked by `verify_at` before the signature, against an explicit instant.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds,
        })
    }

    /// Verify against the wall clock.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify as of `now` (unix seconds).
    ///
    /// Order of checks:
    /// 1. structure + claims parse -> `Malformed`
    /// 2. `exp` (+ leeway) before `now` -> `Expired`, whatever the signature
    /// 3. signature -> `SignatureInvalid`
    pub fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedToken, TokenError> {
        let claims = peek_claims(token)?;

        let leeway = i64::try_from(self.leeway_seconds).unwrap_or(i64::MAX);
        if claims.exp.saturating_add(leeway) < now {
            return Err(TokenError::Expired);
        }

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(VerifiedToken {
            subject: data.claims.sub,
            issued_at: data.claims.iat,
            expires_at: data.claims.exp,
        })
    }
}

// Decode the payload without checking the signature. Only used to classify the token.
fn peek_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    if header.is_empty() || payload.is_empty() || signature.is_empty() {
        return Err(TokenError::Malformed);
    }

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    let claims: TokenClaims = serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    if claims.sub.trim().is_empty() {
        return Err(TokenError::Malformed);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::test_support::{SECRET, codec, mint, mint_with};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const NOW: i64 = 1_750_000_000;

    #[test]
    fn returns_subject_unmodified() {
        let token = mint("Alice@Email.com", NOW + 60);
        let verified = codec().verify_at(&token, NOW).unwrap();

        assert_eq!(verified.subject, "Alice@Email.com");
        assert_eq!(verified.expires_at, NOW + 60);
    }

    #[test]
    fn rejects_tokens_without_three_segments() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c"] {
            assert_eq!(codec().verify_at(token, NOW), Err(TokenError::Malformed));
        }
    }

    #[test]
    fn rejects_payload_that_is_not_a_claim_set() {
        let garbage = format!("{}.{}.sig", URL_SAFE_NO_PAD.encode("{}"), "%%%");
        assert_eq!(codec().verify_at(&garbage, NOW), Err(TokenError::Malformed));

        let no_sub = mint_with(&json!({ "exp": NOW + 60 }), SECRET.as_bytes());
        assert_eq!(codec().verify_at(&no_sub, NOW), Err(TokenError::Malformed));

        let no_exp = mint_with(&json!({ "sub": "alice" }), SECRET.as_bytes());
        assert_eq!(codec().verify_at(&no_exp, NOW), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_key_is_signature_invalid() {
        let token = mint_with(&json!({ "sub": "alice", "exp": NOW + 60 }), b"other-secret");
        assert_eq!(
            codec().verify_at(&token, NOW),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn tampered_payload_is_signature_invalid() {
        let token = mint("alice", NOW + 60);
        let forged_payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "bob", "exp": NOW + 60 }).to_string());

        let parts: Vec<&str> = token.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            codec().verify_at(&forged, NOW),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn other_algorithm_is_signature_invalid() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS384),
            &json!({ "sub": "alice", "exp": NOW + 60 }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(
            codec().verify_at(&token, NOW),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn expired_wins_over_bad_signature() {
        let good = mint("alice", NOW - 1);
        let forged = mint_with(&json!({ "sub": "alice", "exp": NOW - 1 }), b"other-secret");

        assert_eq!(codec().verify_at(&good, NOW), Err(TokenError::Expired));
        assert_eq!(codec().verify_at(&forged, NOW), Err(TokenError::Expired));
    }

    #[test]
    fn expiry_instant_itself_is_still_valid() {
        let token = mint("alice", NOW);
        assert!(codec().verify_at(&token, NOW).is_ok());
    }

    #[test]
    fn leeway_extends_expiry() {
        let key = VerificationKey::HmacSecret(SECRET.as_bytes().to_vec());
        let lenient = TokenCodec::new(&key, 30).unwrap();
        let token = mint("alice", NOW - 10);

        assert!(lenient.verify_at(&token, NOW).is_ok());
        assert_eq!(lenient.verify_at(&token, NOW + 41), Err(TokenError::Expired));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(TokenCodec::new(&VerificationKey::HmacSecret(Vec::new()), 0).is_err());
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let key = VerificationKey::HmacSecret(SECRET.as_bytes().to_vec());
        assert!(!format!("{:?}", key).contains(SECRET));
    }
}
