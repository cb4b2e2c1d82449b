use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub exp: i64,
}

pub fn generate_token<K: AsRef<[u8]>>(
    claims: UserClaims,
    key: K,
) -> jsonwebtoken::errors::Result<String> {
    let header = Header::default();
    let key = EncodingKey::from_secret(key.as_ref());

    let token = jsonwebtoken::encode(&header, &claims, &key)?;
    Ok(token)
}

pub fn process_token<K: AsRef<[u8]>>(
    token: &str,
    key: K,
) -> jsonwebtoken::errors::Result<TokenData<UserClaims>> {
    let validation = Validation::default();
    let key = DecodingKey::from_secret(key.as_ref());

    let claims = jsonwebtoken::decode::<UserClaims>(token, &key, &validation)?;
    Ok(claims)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn token_round_trip() {
        let claims = UserClaims {
            sub: String::from("d4f0252c-98f5-4b39-90a3-3c7d0b3f3a11"),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };

        let token = generate_token(claims.clone(), "test-key").unwrap();
        let decoded = process_token(&token, "test-key").unwrap();
        assert_eq!(decoded.claims.sub, claims.sub);
    }

    #[test]
    fn token_rejects_wrong_key() {
        let claims = UserClaims {
            sub: String::from("d4f0252c-98f5-4b39-90a3-3c7d0b3f3a11"),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        };

        let token = generate_token(claims, "test-key").unwrap();
        assert!(process_token(&token, "other-key").is_err());
    }

    #[test]
    fn token_rejects_expired() {
        let claims = UserClaims {
            sub: String::from("d4f0252c-98f5-4b39-90a3-3c7d0b3f3a11"),
            exp: (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp(),
        };

        let token = generate_token(claims, "test-key").unwrap();
        assert!(process_token(&token, "test-key").is_err());
    }
}
