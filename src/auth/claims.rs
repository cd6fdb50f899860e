use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Access token claims. Only the subject's identity is asserted; the role is
/// looked up again on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user email)
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(email: &str, issued_at: DateTime<Utc>, expiration_minutes: i64) -> Self {
        let exp = issued_at + Duration::minutes(expiration_minutes);

        Self {
            sub: email.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = Claims::new("john@example.com", now, 30);

        assert_eq!(claims.sub, "john@example.com");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_claims_expiry_boundary() {
        let issued = Utc::now();
        let claims = Claims::new("john@example.com", issued, 30);

        assert!(!claims.is_expired_at(issued + Duration::minutes(30) - Duration::seconds(1)));
        assert!(claims.is_expired_at(issued + Duration::minutes(30)));
    }
}
