//! 登录会话
//!
//! 显式传入客户端，不使用全局状态

use crate::config::Config;

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

/// 会话上下文
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<AuthUser>,
    pub access_token: Option<String>,
}

impl Session {
    /// 从配置构建会话
    pub fn from_config(config: &Config) -> Self {
        Self {
            user: config.user_id.clone().map(|id| AuthUser { id }),
            access_token: config.access_token.clone(),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_follows_config() {
        let config = Config {
            user_id: Some("u-7".to_string()),
            access_token: Some("tok".to_string()),
            ..Config::default()
        };
        let session = Session::from_config(&config);
        assert_eq!(session.user_id(), Some("u-7"));
        assert!(session.is_authenticated());

        assert!(!Session::default().is_authenticated());
    }
}
