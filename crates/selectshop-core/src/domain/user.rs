//! 사용자(자격증명) 레코드.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRole;

/// 저장된 사용자 레코드.
///
/// 비밀번호는 다이제스트(PHC 문자열)로만 보관하며 직렬화하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// 신규 사용자 입력 (저장소 삽입용).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_digest: String,
    pub email: String,
    pub role: UserRole,
}
