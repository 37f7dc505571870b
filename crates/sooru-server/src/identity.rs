//! Bearer tokens and password hashing.
//!
//! Tokens are `base64url(claims).base64url(hmac_sha256(claims))` where the
//! claims carry the subject user id and an expiry in unix seconds. Password
//! hashes are PBKDF2-HMAC-SHA256 with a random 16-byte salt, stored as
//! `pbkdf2-sha256$<rounds>$<salt>$<hash>`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use sooru_core::UserId;
use subtle::ConstantTimeEq;
use std::fmt::{Display, Formatter};
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

pub const PASSWORD_HASH_SCHEME: &str = "pbkdf2-sha256";
pub const PASSWORD_HASH_ROUNDS: u32 = 10_000;
/// Stored hashes asking for more rounds than this are refused unverified.
pub const MAX_PASSWORD_HASH_ROUNDS: u32 = 1_000_000;
const SALT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AuthError {
    Missing,
    Malformed,
    BadSignature,
    Expired,
}

impl AuthError {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing bearer token",
            Self::Malformed => "malformed bearer token",
            Self::BadSignature => "invalid token signature",
            Self::Expired => "token expired",
        }
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError(pub String);

impl Display for IdentityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "identity error: {}", self.0)
    }
}

impl std::error::Error for IdentityError {}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, IdentityError> {
        if secret.is_empty() {
            return Err(IdentityError("token secret must not be empty".to_string()));
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| IdentityError(format!("token secret rejected: {e}")))?;
        Ok(Self { mac, ttl })
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user: &UserId, now_secs: u64) -> Result<String, IdentityError> {
        let claims = Claims {
            sub: user.as_str().to_string(),
            exp: now_secs.saturating_add(self.ttl.as_secs()),
        };
        let body = serde_json::to_vec(&claims)
            .map_err(|e| IdentityError(format!("claims encode failed: {e}")))?;
        let payload = URL_SAFE_NO_PAD.encode(body);
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    pub fn verify(&self, token: &str, now_secs: u64) -> Result<UserId, AuthError> {
        let (payload, signature) = token.trim().split_once('.').ok_or(AuthError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::Malformed)?;
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        let body = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&body).map_err(|_| AuthError::Malformed)?;
        if claims.exp <= now_secs {
            return Err(AuthError::Expired);
        }
        UserId::new(&claims.sub).map_err(|_| AuthError::Malformed)
    }

    /// Verify an `Authorization` header value of the form `Bearer <token>`.
    pub fn authenticate(&self, header: Option<&str>, now_secs: u64) -> Result<UserId, AuthError> {
        let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or(AuthError::Missing)?;
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(AuthError::Malformed)?;
        self.verify(token, now_secs)
    }
}

pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let mut salt = [0_u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_password_with(password, &salt, PASSWORD_HASH_ROUNDS)
}

pub(crate) fn hash_password_with(
    password: &str,
    salt: &[u8],
    rounds: u32,
) -> Result<String, IdentityError> {
    if rounds == 0 || rounds > MAX_PASSWORD_HASH_ROUNDS {
        return Err(IdentityError(format!(
            "password hash rounds must be within 1..={MAX_PASSWORD_HASH_ROUNDS}, got {rounds}"
        )));
    }
    let derived = derive_key(password.as_bytes(), salt, rounds);
    Ok(format!(
        "{PASSWORD_HASH_SCHEME}${rounds}${}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(derived)
    ))
}

/// False for a wrong password and for any stored value that does not parse.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(rounds), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };
    if scheme != PASSWORD_HASH_SCHEME {
        return false;
    }
    let (Ok(rounds), Ok(salt), Ok(expected)) = (
        rounds.parse::<u32>(),
        URL_SAFE_NO_PAD.decode(salt),
        URL_SAFE_NO_PAD.decode(expected),
    ) else {
        return false;
    };
    if rounds == 0 || rounds > MAX_PASSWORD_HASH_ROUNDS {
        return false;
    }
    let derived = derive_key(password.as_bytes(), &salt, rounds);
    derived.ct_eq(expected.as_slice()).into()
}

fn derive_key(password: &[u8], salt: &[u8], rounds: u32) -> [u8; 32] {
    let mut out = [0_u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new(b"unit-test-secret-0123", Duration::from_secs(60)).expect("signer")
    }

    fn user() -> UserId {
        UserId::new("usr-000001").expect("user id")
    }

    #[test]
    fn issued_token_verifies_until_expiry() {
        let s = signer();
        let token = s.issue(&user(), 1_000).expect("issue");
        assert_eq!(s.verify(&token, 1_000).expect("valid"), user());
        assert_eq!(s.verify(&token, 1_059).expect("valid"), user());
        assert_eq!(s.verify(&token, 1_060), Err(AuthError::Expired));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let s = signer();
        let token = s.issue(&user(), 1_000).expect("issue");
        let (payload, sig) = token.split_once('.').expect("two parts");

        let forged_claims = URL_SAFE_NO_PAD.encode(br#"{"sub":"usr-000002","exp":99999}"#);
        assert_eq!(
            s.verify(&format!("{forged_claims}.{sig}"), 1_000),
            Err(AuthError::BadSignature)
        );
        assert_eq!(s.verify(payload, 1_000), Err(AuthError::Malformed));

        let other = TokenSigner::new(b"another-secret-0123456", Duration::from_secs(60))
            .expect("signer");
        assert_eq!(other.verify(&token, 1_000), Err(AuthError::BadSignature));
    }

    #[test]
    fn authorization_header_requires_bearer_scheme() {
        let s = signer();
        let token = s.issue(&user(), 10).expect("issue");
        assert_eq!(s.authenticate(None, 10), Err(AuthError::Missing));
        assert_eq!(s.authenticate(Some("  "), 10), Err(AuthError::Missing));
        assert_eq!(
            s.authenticate(Some(&format!("Basic {token}")), 10),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            s.authenticate(Some(&format!("Bearer {token}")), 10).expect("ok"),
            user()
        );
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(TokenSigner::new(b"", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn password_hash_round_trip_and_salt_uniqueness() {
        let a = hash_password("secret-pw").expect("hash");
        let b = hash_password("secret-pw").expect("hash");
        assert_ne!(a, b);
        assert!(a.starts_with("pbkdf2-sha256$10000$"));
        assert!(verify_password("secret-pw", &a));
        assert!(verify_password("secret-pw", &b));
        assert!(!verify_password("Secret-pw", &a));
    }

    #[test]
    fn pbkdf2_matches_rfc7914_vector() {
        // PBKDF2-HMAC-SHA256, P="passwd", S="salt", c=1, first 32 bytes.
        let derived = derive_key(b"passwd", b"salt", 1);
        let hex: String = derived.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn stored_hashes_over_the_round_cap_are_refused() {
        let salt = [7_u8; SALT_LEN];
        let over = format!(
            "{PASSWORD_HASH_SCHEME}${}${}${}",
            u32::MAX,
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode([0_u8; 32])
        );
        assert!(!verify_password("pw", &over));
        assert!(hash_password_with("pw", &salt, MAX_PASSWORD_HASH_ROUNDS + 1).is_err());
        assert!(hash_password_with("pw", &salt, 0).is_err());
    }

    #[test]
    fn digest_length_mismatch_never_verifies() {
        let stored = hash_password_with("pw", &[1_u8; SALT_LEN], 2).expect("hash");
        assert!(verify_password("pw", &stored));
        let truncated = &stored[..stored.len() - 4];
        assert!(!verify_password("pw", truncated));
    }

    #[test]
    fn garbage_stored_hashes_never_verify() {
        for stored in ["", "plain", "bcrypt$1$a$b", "pbkdf2-sha256$0$AA$AA", "pbkdf2-sha256$x$AA$AA"] {
            assert!(!verify_password("anything", stored), "{stored}");
        }
    }
}
