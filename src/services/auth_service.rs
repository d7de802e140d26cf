//! 认证服务：注册与登录

use crate::{
    auth::{PasswordHasher, TokenService},
    error::AppError,
    models::auth::{AuthData, LoginRequest, RegisterRequest},
    repository::UserRepository,
};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    db: PgPool,
    token_service: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: PgPool, token_service: Arc<TokenService>, hasher: PasswordHasher) -> Self {
        Self {
            db,
            token_service,
            hasher,
        }
    }

    /// 用户注册
    ///
    /// 先做存在性检查作为快速路径；最终权威是 email 上的唯一索引，
    /// 并发写入时约束冲突同样映射为 DuplicateUser。
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthData, AppError> {
        req.validate()
            .map_err(|_| AppError::Validation("All fields required".to_string()))?;

        let repo = UserRepository::new(self.db.clone());

        if repo.find_by_email(&req.email).await?.is_some() {
            return Err(AppError::DuplicateUser);
        }

        // bcrypt 在工作因子 10 下需要几十毫秒，放到阻塞线程池执行
        let hasher = self.hasher.clone();
        let password = req.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

        let user = repo.create(&req.name, &req.email, &password_hash).await?;

        let token = self.token_service.issue(&user.id)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthData {
            user: user.into(),
            token,
        })
    }

    /// 用户登录
    ///
    /// 未知邮箱与错误密码返回同一个 InvalidCredentials（防枚举），
    /// 对外不可区分。
    pub async fn login(&self, req: LoginRequest) -> Result<AuthData, AppError> {
        req.validate()
            .map_err(|_| AppError::Validation("Email and password required".to_string()))?;

        let repo = UserRepository::new(self.db.clone());

        // 显式取密码哈希（普通读取不含哈希列）
        let Some(user) = repo.find_by_email_with_password(&req.email).await? else {
            return Err(AppError::InvalidCredentials);
        };

        let hasher = self.hasher.clone();
        let password = req.password.clone();
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?;

        if !verified {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.token_service.issue(&user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthData {
            user: user.into(),
            token,
        })
    }
}
