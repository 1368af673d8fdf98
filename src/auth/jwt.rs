use jsonwebtoken::{DecodingKey, Validation, decode, errors::Error};
use serde::{Deserialize, Serialize};

use crate::model::{EmployeeId, OrgId};

/// Claims carried by tokens from the external identity service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
    /// Present only if this user is linked to an employee record
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub org_id: Option<OrgId>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

/// Verifies signature and expiry. Issuing tokens happens elsewhere.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e: Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn token(secret: &str, exp: usize) -> String {
        let claims = Claims {
            user_id: 1,
            sub: "jane".to_string(),
            role: 3,
            exp,
            jti: "t-1".to_string(),
            token_type: TokenType::Access,
            employee_id: Some(7),
            org_id: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let claims = verify_token(&token("s3cret", 4_102_444_800), "s3cret").unwrap();
        assert_eq!(claims.employee_id, Some(7));
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        assert!(verify_token(&token("s3cret", 4_102_444_800), "other").is_err());
        assert!(verify_token(&token("s3cret", 1_000), "s3cret").is_err());
    }
}
