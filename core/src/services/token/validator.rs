//! Credential validation

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::entities::Claims;
use crate::errors::TokenError;

/// Signing algorithms accepted by the validator. Everything else,
/// including `none`, is rejected before the signature is checked.
pub const ALLOWED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

// `sub` stays untyped until the signature is verified so that a wrong type
// maps to `InvalidSubject` instead of a parse failure
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<Value>,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    role: Option<Value>,
}

/// Verifies HMAC-signed bearer credentials against a shared secret
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Creates a validator for tokens signed with `secret`
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ALLOWED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validates `token` and returns its claims.
    ///
    /// # Errors
    ///
    /// * `Malformed` - the token cannot be parsed
    /// * `Unverifiable` - disallowed algorithm or bad signature
    /// * `Expired` - `exp` is not strictly in the future
    /// * `InvalidSubject` - `sub` is missing or not an unsigned integer
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let token = token.trim();
        self.check_algorithm(token)?;

        let data = decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?;
        let raw = data.claims;

        if raw.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        let sub = raw
            .sub
            .as_ref()
            .and_then(subject_id)
            .ok_or(TokenError::InvalidSubject)?;

        Ok(Claims {
            sub,
            iat: raw.iat,
            exp: raw.exp,
            role: raw.role.and_then(|r| r.as_str().map(str::to_owned)),
        })
    }

    fn check_algorithm(&self, token: &str) -> Result<(), TokenError> {
        let mut segments = token.split('.');
        let header = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(header), Some(_), Some(_), None) => header,
            _ => return Err(TokenError::Malformed),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenError::Malformed)?;
        let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

        match header.alg.as_deref().map(str::parse::<Algorithm>) {
            Some(Ok(alg)) if ALLOWED_ALGORITHMS.contains(&alg) => Ok(()),
            _ => Err(TokenError::Unverifiable),
        }
    }
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidator")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

fn map_decode_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm | ErrorKind::InvalidKeyFormat => {
            TokenError::Unverifiable
        }
        _ => TokenError::Malformed,
    }
}

// Integral JSON numbers only; issuers that encode ids as floats are accepted
fn subject_id(value: &Value) -> Option<u64> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(id) = number.as_u64() {
        return Some(id);
    }
    let float = number.as_f64()?;
    if float.fract() == 0.0 && float >= 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}
