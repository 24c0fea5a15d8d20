//! 비밀번호 다이제스트.
//!
//! Argon2id로 평문 비밀번호를 PHC 문자열로 바꾸고, 로그인 시 비교합니다.
//! 비교는 라이브러리 내부에서 상수 시간으로 수행됩니다.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use subtle::ConstantTimeEq;
use validator::ValidationError;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("저장된 다이제스트 형식이 잘못되었습니다")]
    InvalidDigest,
}

/// 평문 비밀번호의 다이제스트 생성.
///
/// 솔트가 매번 새로 생성되므로 같은 비밀번호라도 결과가 다릅니다.
///
/// ```rust,ignore
/// let digest = hash_password("password1")?;
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// 평문 비밀번호가 저장된 다이제스트와 일치하는지 확인.
///
/// 불일치는 `Ok(false)`, 다이제스트 자체가 손상된 경우만 에러입니다.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::InvalidDigest)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(_) => Err(PasswordError::InvalidDigest),
    }
}

/// 공유 비밀 값 비교.
///
/// 내용 비교는 상수 시간이며, 길이 차이만 즉시 드러납니다.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// 비밀번호 강도 검증 (`validator` 커스텀 함수).
///
/// - 최소 8자 이상
/// - 최소 1개의 숫자 포함
/// - 최소 1개의 영문자 포함
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let fail = |code: &'static str, message: &'static str| {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        Err(err)
    };

    if password.chars().count() < 8 {
        return fail("password_length", "비밀번호는 최소 8자 이상이어야 합니다");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return fail("password_digit", "비밀번호에 최소 1개의 숫자가 포함되어야 합니다");
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return fail("password_letter", "비밀번호에 최소 1개의 영문자가 포함되어야 합니다");
    }

    Ok(())
}
