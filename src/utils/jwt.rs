use crate::config::JwtConfig;
use crate::models::principals::entities::PrincipalKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,              // Subject (主体 ID)
    pub user_type: PrincipalKind, // 主体类型
    pub exp: usize,               // Expiration time (时间戳)
    pub iat: usize,               // Issued at (签发时间)
}

impl Claims {
    /// 解析 sub 中的主体 ID
    pub fn principal_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// 令牌编解码器，启动时由配置构建一次
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: chrono::Duration,
}

impl JwtUtils {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry: chrono::Duration::minutes(config.access_token_expiry),
        }
    }

    /// access token 有效期（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_expiry.num_seconds()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        &self,
        principal_id: Uuid,
        kind: PrincipalKind,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.generate_token_with_expiry(principal_id, kind, self.access_token_expiry)
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        &self,
        principal_id: Uuid,
        kind: PrincipalKind,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: principal_id.to_string(),
            user_type: kind,
            exp: expiration.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    // 验证 Access Token（签名与过期时间）
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation).map(|token_data| token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtUtils {
        JwtUtils::new(&JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 30,
        })
    }

    #[test]
    fn test_access_token_roundtrip() {
        let utils = jwt();
        let id = Uuid::new_v4();
        let token = utils
            .generate_access_token(id, PrincipalKind::Examiner)
            .unwrap();
        let claims = utils.verify_access_token(&token).unwrap();
        assert_eq!(claims.principal_id(), Some(id));
        assert_eq!(claims.user_type, PrincipalKind::Examiner);
        assert_eq!(utils.access_token_expires_in(), 30 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let utils = jwt();
        let token = utils
            .generate_token_with_expiry(
                Uuid::new_v4(),
                PrincipalKind::Examinee,
                chrono::Duration::minutes(-10),
            )
            .unwrap();
        assert!(utils.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = JwtUtils::new(&JwtConfig {
            secret: "another-secret".to_string(),
            access_token_expiry: 30,
        });
        let token = other
            .generate_access_token(Uuid::new_v4(), PrincipalKind::Administrator)
            .unwrap();
        assert!(jwt().verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let utils = jwt();
        let token = utils
            .generate_access_token(Uuid::new_v4(), PrincipalKind::Examinee)
            .unwrap();
        let mut tampered = token.clone();
        tampered.push('x');
        assert!(utils.verify_access_token(&tampered).is_err());
        assert!(utils.verify_access_token("not-a-token").is_err());
    }
}
