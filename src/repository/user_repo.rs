//! User repository (数据库访问层)

use crate::{
    error::AppError,
    models::user::{User, UserCredentials},
};
use sqlx::{PgPool, Row};

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据邮箱查找用户（不含密码哈希）
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户，显式带上密码哈希
    /// 只有登录路径使用；普通读取永远不取哈希列
    pub async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let user = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 创建用户
    ///
    /// email 上的唯一索引是重复检测的最终权威：并发注册下两个请求的
    /// 存在性检查可能都通过，这里把约束冲突映射为 DuplicateUser。
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::DuplicateUser)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 统计某邮箱的记录数
    pub async fn count_by_email(&self, email: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.db)
            .await?
            .get(0);

        Ok(count)
    }
}
