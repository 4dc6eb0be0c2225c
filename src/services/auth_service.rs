use crate::entities::{AccountRole, account_entity as accounts, restaurant_entity as restaurants};
use crate::error::{AppError, AppResult};
use crate::models::{AccountResponse, AuthContext, AuthResponse, CreateAccountRequest, LoginRequest};
use crate::utils::*;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, Set,
};

/// 校验邮箱格式并转为小写
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let email_regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| AppError::InternalError(format!("Invalid email pattern: {e}")))?;
    if !email_regex.is_match(&email) {
        return Err(AppError::ValidationError("Invalid email address".into()));
    }
    Ok(email)
}

/// 新建账号；调用方负责校验。可在事务中使用
pub async fn insert_account<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
    role: AccountRole,
    restaurant_id: Option<i64>,
    email_confirmed: bool,
) -> AppResult<accounts::Model> {
    let exists = accounts::Entity::find()
        .filter(accounts::Column::Email.eq(email))
        .one(db)
        .await?;
    if exists.is_some() {
        return Err(AppError::ValidationError("Email already registered".into()));
    }

    let now = Utc::now();
    let model = accounts::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        restaurant_id: Set(restaurant_id),
        email_confirmed: Set(email_confirmed),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = request.email.trim().to_lowercase();
        let account = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

        if !verify_password(&request.password, &account.password_hash)? {
            return Err(AppError::AuthError("Invalid email or password".to_string()));
        }

        // 密码正确但未确认邮箱时给出单独提示
        if !account.email_confirmed {
            return Err(AppError::AuthError("Email not confirmed".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(
            account.id,
            account.role,
            account.restaurant_id,
        )?;

        log::info!("Account logged in: id={}", account.id);

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_access_token_expires_in(),
            account: account.into(),
        })
    }

    pub async fn me(&self, ctx: &AuthContext) -> AppResult<AccountResponse> {
        let account = accounts::Entity::find_by_id(ctx.account_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".into()))?;
        Ok(account.into())
    }

    /// 超级管理员创建账号
    pub async fn create_account(
        &self,
        ctx: &AuthContext,
        request: CreateAccountRequest,
    ) -> AppResult<AccountResponse> {
        ctx.require_super_admin()?;
        let email = normalize_email(&request.email)?;
        validate_password(&request.password)?;

        let restaurant_id = match request.role {
            AccountRole::SuperAdmin => None,
            AccountRole::RestaurantOwner => {
                let id = request.restaurant_id.ok_or_else(|| {
                    AppError::ValidationError("restaurant_id is required for owners".into())
                })?;
                restaurants::Entity::find_by_id(id)
                    .one(&self.pool)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;
                Some(id)
            }
        };

        let account = insert_account(
            &self.pool,
            &email,
            &request.password,
            request.role,
            restaurant_id,
            request.email_confirmed.unwrap_or(true),
        )
        .await?;
        log::info!("Account created: id={}, role={}", account.id, account.role);
        Ok(account.into())
    }

    pub async fn confirm_account(
        &self,
        ctx: &AuthContext,
        account_id: i64,
    ) -> AppResult<AccountResponse> {
        ctx.require_super_admin()?;
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".into()))?;

        let mut am = account.into_active_model();
        am.email_confirmed = Set(true);
        am.updated_at = Set(Some(Utc::now()));
        Ok(am.update(&self.pool).await?.into())
    }

    /// 启动时确保配置的超级管理员存在；返回是否新建
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> AppResult<bool> {
        let email = normalize_email(email)?;
        let exists = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.as_str()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Ok(false);
        }
        validate_password(password)?;
        insert_account(
            &self.pool,
            &email,
            password,
            AccountRole::SuperAdmin,
            None,
            true,
        )
        .await?;
        log::info!("Bootstrap super admin created: {}", email);
        Ok(true)
    }
}
