//! 统一错误模型
//! 定义所有错误类型和错误响应格式

use crate::auth::jwt::TokenError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// 是否在响应中附带内部错误详情（仅开发环境）
static EXPOSE_DETAIL: AtomicBool = AtomicBool::new(false);

/// 设置错误详情开关，启动时根据运行环境调用一次
pub fn set_expose_detail(expose: bool) {
    EXPOSE_DETAIL.store(expose, Ordering::Relaxed);
}

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 请求字段缺失或为空（调用方错误）
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 注册时邮箱已存在
    #[error("User already exists")]
    DuplicateUser,

    /// 登录失败：未知邮箱与错误密码统一为同一错误（防枚举）
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 令牌无效（保留给未来的受保护资源消费方）
    #[error("Token rejected: {0}")]
    TokenInvalid(#[from] TokenError),

    /// 后端存储不可达或超时
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Route not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateUser => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户可见的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::DuplicateUser => "User already exists".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::TokenInvalid(_) => "Invalid or expired token".to_string(),
            AppError::NotFound => "Route not found".to_string(),
            AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => {
                "Server error".to_string()
            }
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO，形如 {"success": false, "message": "..."}
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// 内部错误详情，仅开发环境下返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 服务端日志保留完整详情，客户端只拿到通用消息
        if status.is_server_error() {
            tracing::error!(code = self.code(), detail = %self, "Request failed");
        } else {
            tracing::debug!(code = self.code(), detail = %self, "Request rejected");
        }

        let detail = if EXPOSE_DETAIL.load(Ordering::Relaxed) && status.is_server_error() {
            Some(self.to_string())
        } else {
            None
        };

        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
            error: detail,
        };

        (status, Json(body)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::Validation("All fields required".to_string()).code(), 400);
        assert_eq!(AppError::DuplicateUser.code(), 400);
        assert_eq!(AppError::InvalidCredentials.code(), 401);
        assert_eq!(AppError::NotFound.code(), 404);
        assert_eq!(AppError::Internal("boom".to_string()).code(), 500);
    }

    #[test]
    fn test_store_error_message_is_generic() {
        let error = AppError::Store(sqlx::Error::PoolTimedOut);
        let message = error.user_message();
        assert_eq!(message, "Server error");
        assert!(!message.contains("sqlx"));
        assert!(!message.contains("pool"));
    }

    #[test]
    fn test_unknown_email_and_wrong_password_share_one_message() {
        // 防枚举：登录失败只有一种对外表述
        assert_eq!(
            AppError::InvalidCredentials.user_message(),
            "Invalid credentials"
        );
    }
}
