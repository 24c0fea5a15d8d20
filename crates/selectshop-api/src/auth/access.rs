//! 접근 결정.
//!
//! - 선언적 게이트: `(경로 패턴, 정책)` 규칙 목록을 순서대로 평가하고 첫 번째 일치 규칙을 적용
//! - 명령적 게이트: 역할에 따라 상품 조회 범위를 결정 ([`ProductScope`])
//!
//! 패턴 문법 (Ant 스타일):
//! - `**`: 0개 이상의 경로 세그먼트
//! - `*`: 정확히 1개의 세그먼트
//! - 그 외: 세그먼트 단위 정확히 일치

use selectshop_core::UserRole;

use super::error::{AuthError, UnauthenticatedReason};
use super::principal::Principal;

/// 라우트 접근 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// 누구나 접근 가능
    PermitAll,
    /// 인증된 주체만
    Authenticated,
    /// 지정 역할 이상의 주체만
    RequireRole(UserRole),
}

/// 세그먼트 단위 경로 패턴.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<String>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            raw: pattern.to_string(),
            segments: split_segments(pattern).map(str::to_string).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_segments(path).collect();
        let pattern: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        match_segments(&pattern, &path)
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((&head, rest)) => match path.split_first() {
            Some((&segment, remaining)) if head == "*" || head == segment => {
                match_segments(rest, remaining)
            }
            _ => false,
        },
    }
}

#[derive(Debug, Clone)]
struct AccessRule {
    pattern: PathPattern,
    policy: AccessPolicy,
}

/// 순서 있는 접근 규칙 테이블.
#[derive(Debug, Clone)]
pub struct AccessRules {
    rules: Vec<AccessRule>,
    fallback: AccessPolicy,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessRules {
    /// 빈 테이블 (일치하는 규칙이 없으면 `Authenticated`).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: AccessPolicy::Authenticated,
        }
    }

    /// 서비스 기본 규칙.
    pub fn service_defaults() -> Self {
        Self::new()
            .rule("/health/**", AccessPolicy::PermitAll)
            .rule("/metrics", AccessPolicy::PermitAll)
            .rule("/swagger-ui/**", AccessPolicy::PermitAll)
            .rule("/api-docs/**", AccessPolicy::PermitAll)
            .rule("/api/user/**", AccessPolicy::PermitAll)
            // 상품 API는 토큰이 없으면 null을 돌려주므로 서비스 내부에서 판단
            .rule("/api/products/**", AccessPolicy::PermitAll)
            .rule("/api/test-secured", AccessPolicy::RequireRole(UserRole::Admin))
    }

    /// 규칙 추가 (먼저 추가한 규칙이 우선).
    pub fn rule(mut self, pattern: &str, policy: AccessPolicy) -> Self {
        self.rules.push(AccessRule {
            pattern: PathPattern::new(pattern),
            policy,
        });
        self
    }

    /// 경로에 적용될 정책.
    pub fn policy_for(&self, path: &str) -> AccessPolicy {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(path))
            .map(|rule| rule.policy)
            .unwrap_or(self.fallback)
    }

    /// 허용/거부 결정.
    ///
    /// 주체가 없으면 401, 역할이 부족하면 403.
    pub fn decide(&self, path: &str, principal: Option<&Principal>) -> Result<(), AuthError> {
        let required = match self.policy_for(path) {
            AccessPolicy::PermitAll => return Ok(()),
            AccessPolicy::Authenticated => None,
            AccessPolicy::RequireRole(role) => Some(role),
        };

        let principal = principal.ok_or(AuthError::Unauthenticated(
            UnauthenticatedReason::MissingCredentials,
        ))?;

        match required {
            Some(role) if !principal.role.satisfies(role) => Err(AuthError::Forbidden),
            _ => Ok(()),
        }
    }
}

/// 상품 조회 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// 모든 상품 (ADMIN)
    All,
    /// 소유자 ID가 일치하는 상품만 (USER)
    OwnedBy(i64),
}

impl ProductScope {
    pub fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            UserRole::Admin => ProductScope::All,
            UserRole::User => ProductScope::OwnedBy(principal.user_id),
        }
    }
}
