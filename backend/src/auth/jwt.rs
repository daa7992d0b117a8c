//! JWT token issuance and verification
//!
//! Signing and verification are split into two types so that only the
//! issuer ever holds the encoding key. Both are built once at startup
//! from the configured secret; keys are wrapped in `Arc` for cheap cloning.

use super::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// The only algorithm tokens may be signed with
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;
const TOKEN_ALGORITHM_NAME: &str = "HS256";

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Identity attached to a request once its bearer token has been verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub subject: Uuid,
    pub claims: Claims,
}

fn secret_bytes(secret: &SecretString) -> Result<&[u8], AuthError> {
    let secret = secret.expose_secret();
    if secret.trim().is_empty() {
        return Err(AuthError::Configuration(
            "JWT secret is empty or unset".to_string(),
        ));
    }
    Ok(secret.as_bytes())
}

/// Signs access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: Arc<EncodingKey>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from the shared secret
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Result<Self, AuthError> {
        let key = secret_bytes(secret)?;
        if ttl_secs <= 0 {
            return Err(AuthError::Configuration(format!(
                "token lifetime must be positive, got {}s",
                ttl_secs
            )));
        }
        Ok(Self {
            encoding: Arc::new(EncodingKey::from_secret(key)),
            ttl: Duration::seconds(ttl_secs),
        })
    }

    /// Issue an access token for a user, valid from now
    #[inline]
    pub fn issue(&self, subject: Uuid) -> Result<String, AuthError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue an access token with an explicit issuance time
    pub fn issue_at(&self, subject: Uuid, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let exp = issued_at + self.ttl;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Configuration(format!("Failed to sign token: {}", e)))
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

/// Just enough of the JOSE header to read the declared algorithm
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Validates access tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding: Arc<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(secret: &SecretString) -> Result<Self, AuthError> {
        let key = secret_bytes(secret)?;

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is compared against our own clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Ok(Self {
            decoding: Arc::new(DecodingKey::from_secret(key)),
            validation,
        })
    }

    /// Verify a token against the current time
    #[inline]
    pub fn verify(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`
    ///
    /// Checks run in a fixed order: shape, algorithm, signature, claims,
    /// expiry. Every check always runs; none can be skipped.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthContext, AuthError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(AuthError::MalformedToken(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        }

        let alg = declared_algorithm(segments[0])?;
        if alg != TOKEN_ALGORITHM_NAME {
            return Err(AuthError::UnexpectedAlgorithm(alg));
        }
        decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(map_decode_error)?
            .claims;

        let subject = Uuid::parse_str(&claims.sub)
            .map_err(|_| AuthError::MalformedClaims("sub is not a valid user id".to_string()))?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::ExpiredToken);
        }

        Ok(AuthContext { subject, claims })
    }
}

fn declared_algorithm(header_segment: &str) -> Result<String, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|e| AuthError::MalformedToken(format!("header is not base64url: {}", e)))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("header is not valid JSON: {}", e)))?;
    Ok(header.alg)
}

/// Header and algorithm are checked before `decode` runs, so any decoding
/// failure after the signature check concerns the payload.
fn map_decode_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::UnexpectedAlgorithm(err.to_string())
        }
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::MalformedClaims(format!("missing required claim `{}`", claim))
        }
        ErrorKind::Json(_) | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            AuthError::MalformedClaims(err.to_string())
        }
        _ => AuthError::MalformedToken(err.to_string()),
    }
}
