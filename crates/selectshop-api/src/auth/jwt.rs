//! 토큰 코덱.
//!
//! 인증된 신원(subject, role)을 HS256 서명 JWT로 인코딩하고,
//! 전달받은 토큰을 검증하여 [`Claims`]로 디코딩합니다.
//!
//! 서명 키는 [`TokenCodec::new`]에서 한 번만 만들어지고 이후 변경되지 않습니다.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use selectshop_core::UserRole;

/// 토큰이 실리는 HTTP 헤더 이름.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// 역할을 담는 커스텀 클레임 키.
pub const AUTHORIZATION_KEY: &str = "auth";
/// 스킴 마커. 정확히 7글자.
pub const BEARER_PREFIX: &str = "Bearer ";
/// 기본 토큰 유효 시간 (1시간).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;

/// HS256 키의 최소 길이 (바이트).
const MIN_KEY_BYTES: usize = 32;

/// 토큰 페이로드.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이름
    pub sub: String,
    /// 사용자 역할 (`"ROLE_USER"` | `"ROLE_ADMIN"`)
    #[serde(rename = "auth")]
    pub role: UserRole,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// 토큰 디코딩 실패 유형.
///
/// 유형별로 로깅 수준이 다르므로 호출자는 이들을 구분해서 다뤄야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// 구조가 잘못되었거나 알고리즘이 다름
    #[error("잘못된 토큰 형식")]
    Malformed,
    /// 서명 불일치 (위변조 또는 다른 키)
    #[error("유효하지 않은 서명")]
    BadSignature,
    /// 만료된 토큰
    #[error("토큰이 만료되었습니다")]
    Expired,
    /// 서명되지 않았거나 지원하지 않는 형식
    #[error("지원되지 않는 토큰")]
    Unsupported,
}

impl TokenError {
    /// 메트릭/로그 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::Unsupported => "unsupported",
        }
    }
}

/// 토큰 인코딩 에러.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("토큰 인코딩 실패: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// 서명 키 구성 에러.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("JWT 시크릿이 올바른 base64가 아닙니다")]
    NotBase64,
    #[error("JWT 키가 너무 짧습니다: {0}바이트 (최소 {MIN_KEY_BYTES}바이트)")]
    TooShort(usize),
}

/// 토큰 인코더/디코더.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// base64로 인코딩된 시크릿에서 코덱을 만듭니다.
    ///
    /// # Arguments
    ///
    /// * `secret` - base64 시크릿 (디코딩 후 32바이트 이상)
    /// * `ttl_secs` - 토큰 유효 시간 (초)
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self, KeyError> {
        let key = STANDARD
            .decode(secret.trim())
            .map_err(|_| KeyError::NotBase64)?;
        if key.len() < MIN_KEY_BYTES {
            return Err(KeyError::TooShort(key.len()));
        }

        // exp는 직접 검사한다 (경계값 `now >= exp`를 정확히 지키기 위해)
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        })
    }

    /// 토큰 유효 시간 (초).
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// `Bearer ` 접두사가 붙은 서명 토큰을 만듭니다.
    ///
    /// 같은 입력과 `now`에 대해 항상 같은 문자열을 반환합니다.
    pub fn encode(&self, subject: &str, role: UserRole, now: i64) -> Result<String, EncodeError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(format!("{BEARER_PREFIX}{token}"))
    }

    /// 현재 시각 기준으로 토큰을 검증합니다.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, chrono::Utc::now().timestamp())
    }

    /// 주어진 시각 기준으로 토큰을 검증합니다.
    ///
    /// 스킴 마커가 있으면 제거하고, 서명을 확인한 뒤 `now >= exp`이면 만료로 봅니다.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let raw = token.strip_prefix(BEARER_PREFIX).unwrap_or(token);
        self.decode_raw_at(raw, now)
    }

    /// 스킴 마커가 이미 제거된 원시 토큰을 검증합니다.
    ///
    /// 마커를 다시 벗기지 않으므로 `Bearer Bearer <jwt>` 같은 이중 마커는 `Malformed`입니다.
    pub fn decode_raw_at(&self, raw: &str, now: i64) -> Result<Claims, TokenError> {
        inspect_structure(raw)?;

        let data = decode::<Claims>(raw, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                // 헤더와 페이로드는 이미 디코딩되었으므로 base64 실패는 서명 세그먼트에서 난 것
                ErrorKind::InvalidSignature | ErrorKind::Base64(_) => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if now >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

/// 서명 검증 전에 토큰 구조를 확인합니다.
fn inspect_structure(raw: &str) -> Result<(), TokenError> {
    let mut segments = raw.split('.');
    let (header, payload, signature) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() => (h, p, s),
        _ => return Err(TokenError::Malformed),
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: Value = serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
    URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;

    let alg = header
        .get("alg")
        .and_then(Value::as_str)
        .ok_or(TokenError::Malformed)?;

    if alg.eq_ignore_ascii_case("none") || signature.is_empty() {
        return Err(TokenError::Unsupported);
    }
    if let Some(typ) = header.get("typ") {
        if typ.as_str() != Some("JWT") {
            return Err(TokenError::Unsupported);
        }
    }
    if alg != "HS256" {
        return Err(TokenError::Malformed);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // "secret-key-for-testing-only-32bytes!"
    const TEST_SECRET: &str = "c2VjcmV0LWtleS1mb3ItdGVzdGluZy1vbmx5LTMyYnl0ZXMh";
    const NOW: i64 = 1_700_000_000;

    fn codec() -> TokenCodec {
        TokenCodec::new(TEST_SECRET, DEFAULT_TOKEN_TTL_SECS).unwrap()
    }

    fn b64(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    #[test]
    fn test_encode_and_decode_token() {
        let codec = codec();
        let token = codec.encode("kim", UserRole::User, NOW).unwrap();
        assert!(token.starts_with(BEARER_PREFIX));

        let claims = codec.decode_at(&token, NOW).unwrap();
        assert_eq!(claims.sub, "kim");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 3600);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = codec();
        let a = codec.encode("kim", UserRole::Admin, NOW).unwrap();
        let b = codec.encode("kim", UserRole::Admin, NOW).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_role_claim_uses_auth_key() {
        let codec = codec();
        let token = codec.encode("kim", UserRole::Admin, NOW).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let json: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(json[AUTHORIZATION_KEY], "ROLE_ADMIN");
        assert_eq!(json["sub"], "kim");
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let token = codec.encode("kim", UserRole::User, NOW).unwrap();
        let exp = NOW + 3600;

        // exp == now → 만료
        assert_eq!(codec.decode_at(&token, exp), Err(TokenError::Expired));
        // exp == now + 1 → 유효
        assert!(codec.decode_at(&token, exp - 1).is_ok());
    }

    #[test]
    fn test_raw_decode_does_not_strip_marker() {
        let codec = codec();
        let header = codec.encode("kim", UserRole::User, NOW).unwrap();
        let raw = header.strip_prefix(BEARER_PREFIX).unwrap();

        assert_eq!(codec.decode_raw_at(raw, NOW).unwrap().sub, "kim");
        assert_eq!(codec.decode_raw_at(&header, NOW), Err(TokenError::Malformed));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let token = codec().encode("kim", UserRole::User, NOW).unwrap();
        // "another-secret-key-for-tests-32bytes"
        let other =
            TokenCodec::new("YW5vdGhlci1zZWNyZXQta2V5LWZvci10ZXN0cy0zMmJ5dGVz", 3600).unwrap();

        assert_eq!(other.decode_at(&token, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let codec = codec();
        let token = codec.encode("kim", UserRole::User, NOW).unwrap();
        let raw = token.strip_prefix(BEARER_PREFIX).unwrap();
        let parts: Vec<&str> = raw.split('.').collect();

        let forged_payload = b64(&format!(
            r#"{{"sub":"kim","auth":"ROLE_ADMIN","iat":{NOW},"exp":{}}}"#,
            NOW + 3600
        ));
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.decode_at(&forged, NOW), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        assert_eq!(codec.decode_at("", NOW), Err(TokenError::Malformed));
        assert_eq!(codec.decode_at("abc123", NOW), Err(TokenError::Malformed));
        assert_eq!(codec.decode_at("a.b", NOW), Err(TokenError::Malformed));
        assert_eq!(codec.decode_at("a.b.c.d", NOW), Err(TokenError::Malformed));
        assert_eq!(codec.decode_at("!!!.???.sig", NOW), Err(TokenError::Malformed));
    }

    #[test]
    fn test_other_algorithm_is_malformed() {
        let header = b64(r#"{"alg":"HS512","typ":"JWT"}"#);
        let payload = b64(r#"{"sub":"kim","auth":"ROLE_USER","iat":0,"exp":9999999999}"#);
        let token = format!("{header}.{payload}.c2ln");

        assert_eq!(codec().decode_at(&token, NOW), Err(TokenError::Malformed));
    }

    #[test]
    fn test_unsigned_token_is_unsupported() {
        let header = b64(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = b64(r#"{"sub":"kim","auth":"ROLE_ADMIN","iat":0,"exp":9999999999}"#);

        let codec = codec();
        assert_eq!(
            codec.decode_at(&format!("{header}.{payload}."), NOW),
            Err(TokenError::Unsupported)
        );
        assert_eq!(
            codec.decode_at(&format!("{header}.{payload}.c2ln"), NOW),
            Err(TokenError::Unsupported)
        );
    }

    #[test]
    fn test_empty_signature_is_unsupported() {
        let token = codec().encode("kim", UserRole::User, NOW).unwrap();
        let raw = token.strip_prefix(BEARER_PREFIX).unwrap();
        let unsigned = &raw[..=raw.rfind('.').unwrap()];

        assert_eq!(codec().decode_at(unsigned, NOW), Err(TokenError::Unsupported));
    }

    #[test]
    fn test_foreign_typ_is_unsupported() {
        let header = b64(r#"{"alg":"HS256","typ":"at+jwt"}"#);
        let payload = b64(r#"{"sub":"kim","auth":"ROLE_USER","iat":0,"exp":9999999999}"#);
        let token = format!("{header}.{payload}.c2ln");

        assert_eq!(codec().decode_at(&token, NOW), Err(TokenError::Unsupported));
    }

    #[test]
    fn test_short_or_invalid_secret_rejected() {
        // "too-short"
        assert!(matches!(
            TokenCodec::new("dG9vLXNob3J0", 3600),
            Err(KeyError::TooShort(9))
        ));
        assert!(matches!(
            TokenCodec::new("not base64 at all!", 3600),
            Err(KeyError::NotBase64)
        ));
    }
}
