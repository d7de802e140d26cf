//! 认证相关的 HTTP 处理器

use crate::{
    error::AppError,
    middleware::AppState,
    models::{
        auth::{LoginRequest, RegisterRequest},
        response::ApiResponse,
    },
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 注册
///
/// 请求体无法解析时同样走统一信封，与缺字段共用一条校验消息。
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) =
        payload.map_err(|_| AppError::Validation("All fields required".to_string()))?;

    let data = state.auth_service.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User registered successfully", data)),
    ))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) =
        payload.map_err(|_| AppError::Validation("Email and password required".to_string()))?;

    let data = state.auth_service.login(req).await?;

    Ok(Json(ApiResponse::ok("Login successful", data)))
}
