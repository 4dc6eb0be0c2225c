use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{AccountRole, account_entity as accounts};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "owner@cantina.com")]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub role: AccountRole,
    pub restaurant_id: Option<i64>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<accounts::Model> for AccountResponse {
    fn from(m: accounts::Model) -> Self {
        AccountResponse {
            id: m.id,
            email: m.email,
            role: m.role,
            restaurant_id: m.restaurant_id,
            email_confirmed: m.email_confirmed,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AccountResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    /// 餐厅老板必须关联餐厅
    pub restaurant_id: Option<i64>,
    /// 缺省为 true
    pub email_confirmed: Option<bool>,
}

/// 认证中间件写入请求扩展的调用者身份
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: i64,
    pub role: AccountRole,
    pub restaurant_id: Option<i64>,
}

impl AuthContext {
    pub fn is_super_admin(&self) -> bool {
        self.role == AccountRole::SuperAdmin
    }

    pub fn require_super_admin(&self) -> AppResult<()> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    /// 超级管理员可访问所有餐厅，老板只能访问自己的
    pub fn ensure_restaurant_access(&self, restaurant_id: i64) -> AppResult<()> {
        if self.is_super_admin() || self.restaurant_id == Some(restaurant_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
