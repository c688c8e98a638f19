// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `sub` (username), `wallet`, `iat` and
//! `exp`. They are self-contained: verification needs only the server
//! secret, never a database lookup.
//!
//! Every verification failure collapses into one [`TokenRejected`] value.
//! The underlying reason is kept for logging and is never rendered to a
//! client.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TOKEN_TTL_SECS;

/// Identity asserted by a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Username of the token holder.
    pub subject: String,
    /// Ledger address associated with the username at issuance.
    pub wallet: String,
}

impl SessionClaims {
    pub fn new(subject: impl Into<String>, wallet: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            wallet: wallet.into(),
        }
    }
}

/// A successfully verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub claims: SessionClaims,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

/// Wire format of the JWT payload.
#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    wallet: String,
    iat: i64,
    exp: i64,
}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RejectReason {
    Malformed,
    BadSignature,
    Expired,
    Other,
}

/// The single externally visible verification failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid token")]
pub struct TokenRejected {
    reason: RejectReason,
}

impl TokenRejected {
    pub(crate) fn reason(&self) -> RejectReason {
        self.reason
    }
}

/// Token signing failed. Only reachable through a broken key setup.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign session token: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Issues and verifies session tokens with a server-held secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenService {
    /// Create a service using the default 7-day lifetime.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token with the default lifetime.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        self.issue_with_ttl(claims, self.default_ttl)
    }

    /// Issue a token that expires `ttl` after now.
    pub fn issue_with_ttl(&self, claims: &SessionClaims, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let payload = JwtClaims {
            sub: claims.subject.clone(),
            wallet: claims.wallet.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)?)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenRejected> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => RejectReason::Expired,
                ErrorKind::InvalidSignature => RejectReason::BadSignature,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => RejectReason::Malformed,
                _ => RejectReason::Other,
            };
            tracing::debug!(?reason, "session token rejected");
            TokenRejected { reason }
        })?;

        let claims = data.claims;
        if claims.wallet.is_empty() {
            tracing::debug!("session token rejected: empty wallet claim");
            return Err(TokenRejected {
                reason: RejectReason::Malformed,
            });
        }

        Ok(VerifiedToken {
            claims: SessionClaims {
                subject: claims.sub,
                wallet: claims.wallet,
            },
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn service() -> TokenService {
        TokenService::new("unit-test-secret")
    }

    fn alice() -> SessionClaims {
        SessionClaims::new("alice", "0x1111111111111111111111111111111111111111")
    }

    #[test]
    fn issue_then_verify_returns_claims() {
        let svc = service();
        let token = svc.issue(&alice()).unwrap();
        let verified = svc.verify(&token).unwrap();
        assert_eq!(verified.claims, alice());
    }

    #[test]
    fn default_expiry_is_seven_days_out() {
        let svc = service();
        let before = Utc::now().timestamp();
        let token = svc.issue(&alice()).unwrap();
        let verified = svc.verify(&token).unwrap();
        let seven_days = Duration::days(7).num_seconds();
        assert!(verified.expires_at >= before + seven_days);
        assert!(verified.expires_at <= Utc::now().timestamp() + seven_days);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let token = svc.issue_with_ttl(&alice(), Duration::seconds(-30)).unwrap();
        let err = svc.verify(&token).unwrap_err();
        assert_eq!(err.reason(), RejectReason::Expired);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = TokenService::new("other-secret").issue(&alice()).unwrap();
        let err = service().verify(&token).unwrap_err();
        assert_eq!(err.reason(), RejectReason::BadSignature);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service();
        let token = svc.issue(&alice()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut json: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        json["wallet"] = serde_json::Value::String("0xattacker".to_string());
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&json).unwrap());

        let tampered = format!("{}.{}.{}", parts[0], forged, parts[2]);
        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = service().verify("not-a-token").unwrap_err();
        assert_eq!(err.reason(), RejectReason::Malformed);
    }

    #[test]
    fn rejection_message_hides_reason() {
        let svc = service();
        let expired = svc.issue_with_ttl(&alice(), Duration::seconds(-30)).unwrap();
        let expired_err = svc.verify(&expired).unwrap_err();
        let garbage_err = svc.verify("x.y.z").unwrap_err();
        assert_eq!(expired_err.to_string(), "Invalid token");
        assert_eq!(garbage_err.to_string(), "Invalid token");
    }

    #[test]
    fn custom_ttl_is_used_by_issue() {
        let svc = service().with_ttl(Duration::minutes(5));
        assert_eq!(svc.default_ttl(), Duration::minutes(5));
        let verified = svc.verify(&svc.issue(&alice()).unwrap()).unwrap();
        assert!(verified.expires_at <= Utc::now().timestamp() + 300);
    }
}
