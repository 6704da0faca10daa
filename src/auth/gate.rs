//! The ownership gate: turns a raw `Authorization` header into a trusted user id.
//!
//! The id returned here is the only identity any downstream operation may act on.
//! Nothing taken from a request body or path is ever trusted as a user id.

use super::token::{TokenCodec, TokenError};

const BEARER_SCHEME: &str = "Bearer";

/// Verifies a `Bearer <token>` header value and returns the user id it carries.
pub fn authorize(header: Option<&str>, codec: &TokenCodec) -> Result<i32, TokenError> {
    let value = header.ok_or(TokenError::MissingHeader)?;
    if value.is_empty() {
        return Err(TokenError::MissingHeader);
    }

    let mut parts = value.split(' ');
    let token = match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => token,
        _ => return Err(TokenError::MalformedHeader),
    };

    codec.verify(token).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn codec() -> TokenCodec {
        TokenCodec::new(b"gate-secret", Duration::hours(1))
    }

    #[test]
    fn test_valid_bearer_header() {
        let codec = codec();
        let header = format!("Bearer {}", codec.sign(42).unwrap());
        assert_eq!(authorize(Some(&header), &codec), Ok(42));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(authorize(None, &codec()), Err(TokenError::MissingHeader));
        assert_eq!(authorize(Some(""), &codec()), Err(TokenError::MissingHeader));
    }

    #[test]
    fn test_malformed_header() {
        let codec = codec();
        let token = codec.sign(1).unwrap();
        for header in [
            token.clone(),
            format!("bearer {}", token),
            format!("Basic {}", token),
            "Bearer".to_string(),
            "Bearer ".to_string(),
            format!("Bearer {} extra", token),
        ] {
            assert_eq!(
                authorize(Some(&header), &codec),
                Err(TokenError::MalformedHeader),
                "header {:?} should be rejected",
                header
            );
        }
    }

    #[test]
    fn test_token_from_other_secret() {
        let foreign = TokenCodec::new(b"someone-else", Duration::hours(1));
        let header = format!("Bearer {}", foreign.sign(1).unwrap());
        assert_eq!(authorize(Some(&header), &codec()), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_expired_token() {
        let codec = codec();
        let stale = codec.sign_at(1, Utc::now() - Duration::hours(2)).unwrap();
        let header = format!("Bearer {}", stale);
        assert_eq!(authorize(Some(&header), &codec), Err(TokenError::Expired));
    }
}
