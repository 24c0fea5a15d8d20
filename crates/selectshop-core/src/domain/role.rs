//! 사용자 역할.
//!
//! 외부 표현(토큰 클레임, 응답)은 `"ROLE_USER"` / `"ROLE_ADMIN"` 두 문자열뿐입니다.

use serde::{Deserialize, Serialize};

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum UserRole {
    /// 일반 사용자 - 본인 상품만 조회/수정
    #[serde(rename = "ROLE_USER")]
    User,
    /// 관리자 - 모든 상품 조회
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl UserRole {
    pub const USER_AUTHORITY: &'static str = "ROLE_USER";
    pub const ADMIN_AUTHORITY: &'static str = "ROLE_ADMIN";

    /// 권한 문자열 반환 (`ROLE_USER` | `ROLE_ADMIN`).
    pub fn authority(&self) -> &'static str {
        match self {
            UserRole::User => Self::USER_AUTHORITY,
            UserRole::Admin => Self::ADMIN_AUTHORITY,
        }
    }

    /// 저장소 컬럼 값 (`USER` | `ADMIN`).
    pub fn db_name(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }

    /// 역할의 우선순위 레벨 반환 (높을수록 더 많은 권한).
    pub fn level(&self) -> u8 {
        match self {
            UserRole::Admin => 100,
            UserRole::User => 10,
        }
    }

    /// 요구 역할 이상인지 확인.
    pub fn satisfies(&self, required: UserRole) -> bool {
        self.level() >= required.level()
    }

    /// 문자열에서 역할 파싱.
    ///
    /// 권한 문자열과 저장소 컬럼 값을 모두 받습니다. 대소문자는 구분합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ROLE_USER" | "USER" => Some(UserRole::User),
            "ROLE_ADMIN" | "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.authority())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::User).unwrap(), "\"ROLE_USER\"");
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ROLE_ADMIN\"");

        let parsed: UserRole = serde_json::from_str("\"ROLE_ADMIN\"").unwrap();
        assert_eq!(parsed, UserRole::Admin);

        assert!(serde_json::from_str::<UserRole>("\"ADMIN\"").is_err());
        assert!(serde_json::from_str::<UserRole>("\"role_admin\"").is_err());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(UserRole::parse("ROLE_USER"), Some(UserRole::User));
        assert_eq!(UserRole::parse("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("admin"), None);
        assert_eq!(UserRole::parse("ROLE_ROOT"), None);
    }

    #[test]
    fn test_role_satisfies() {
        assert!(UserRole::Admin.satisfies(UserRole::User));
        assert!(UserRole::Admin.satisfies(UserRole::Admin));
        assert!(UserRole::User.satisfies(UserRole::User));
        assert!(!UserRole::User.satisfies(UserRole::Admin));
    }

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "ROLE_ADMIN");
        assert_eq!(UserRole::User.db_name(), "USER");
    }
}
