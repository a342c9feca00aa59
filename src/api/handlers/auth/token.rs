//! Session token codec.
//!
//! Tokens are compact HS256 JWTs carrying the identity attributes needed by
//! downstream handlers. Validation is entirely local: signature plus expiry,
//! no server-side lookup, so any process holding the secret can verify a
//! token independently.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claims embedded in a session token.
///
/// `roles`, `user_type` and `permissions` default to empty when absent so an
/// older or minimal token still decodes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub user_type: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

/// Sign claims into a compact token expiring `ttl_seconds` from now.
/// # Errors
/// Returns an error if serialization or signing fails.
pub fn encode_token(
    subject: &str,
    roles: &[String],
    user_type: &str,
    permissions: &[String],
    secret: &SecretString,
    ttl_seconds: i64,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: subject.to_string(),
        roles: roles.to_vec(),
        user_type: user_type.to_string(),
        permissions: permissions.to_vec(),
        exp: unix_now().saturating_add(ttl_seconds),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )?;

    Ok(token)
}

/// Verify a token and extract its claims.
///
/// Any failure, whether a bad signature, a malformed token or an expired
/// `exp`, is `None`. Callers cannot distinguish the cases.
#[must_use]
pub fn decode_token(token: &str, secret: &SecretString) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn secret() -> SecretString {
        SecretString::from("test-signing-secret")
    }

    fn roles() -> Vec<String> {
        vec!["admin".to_string()]
    }

    fn permissions() -> Vec<String> {
        vec!["view_pc".to_string(), "manage_users".to_string()]
    }

    #[test]
    fn round_trip_preserves_claims() -> Result<()> {
        let token = encode_token("admin", &roles(), "admin", &permissions(), &secret(), 60)?;
        let claims = decode_token(&token, &secret()).expect("token should decode");

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.roles, roles());
        assert_eq!(claims.user_type, "admin");
        assert_eq!(claims.permissions, permissions());
        Ok(())
    }

    #[test]
    fn wrong_secret_is_invalid() -> Result<()> {
        let token = encode_token("admin", &roles(), "admin", &permissions(), &secret(), 60)?;
        assert!(decode_token(&token, &SecretString::from("other-secret")).is_none());
        Ok(())
    }

    #[test]
    fn tampered_token_is_invalid() -> Result<()> {
        let token = encode_token("admin", &roles(), "admin", &permissions(), &secret(), 60)?;

        // Flip one character at every position; every mutation must fail to
        // decode, regardless of which segment it lands in.
        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
            let Ok(mutated) = String::from_utf8(bytes) else {
                continue;
            };
            if mutated == token {
                continue;
            }
            assert!(
                decode_token(&mutated, &secret()).is_none(),
                "mutation at byte {index} decoded"
            );
        }
        Ok(())
    }

    #[test]
    fn structurally_malformed_token_is_invalid() {
        assert!(decode_token("", &secret()).is_none());
        assert!(decode_token("not-a-token", &secret()).is_none());
        assert!(decode_token("a.b", &secret()).is_none());
    }

    #[test]
    fn expired_token_is_invalid() -> Result<()> {
        let token = encode_token("admin", &roles(), "admin", &permissions(), &secret(), -10)?;
        assert!(decode_token(&token, &secret()).is_none());
        Ok(())
    }

    #[test]
    fn zero_ttl_token_expires_within_a_second() -> Result<()> {
        let token = encode_token("admin", &roles(), "admin", &permissions(), &secret(), 0)?;
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(decode_token(&token, &secret()).is_none());
        Ok(())
    }

    #[test]
    fn missing_optional_claims_default_to_empty() -> Result<()> {
        // Token carrying only subject and expiry.
        #[derive(Serialize)]
        struct MinimalClaims {
            sub: String,
            exp: i64,
        }

        let minimal = MinimalClaims {
            sub: "admin".to_string(),
            exp: unix_now() + 60,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &minimal,
            &EncodingKey::from_secret(secret().expose_secret().as_bytes()),
        )?;

        let claims = decode_token(&token, &secret()).expect("minimal token should decode");
        assert_eq!(claims.sub, "admin");
        assert!(claims.roles.is_empty());
        assert!(claims.user_type.is_empty());
        assert!(claims.permissions.is_empty());
        Ok(())
    }
}
