//! 认证服务主入口

use auth_service::{
    auth::{PasswordHasher, TokenService},
    config::AppConfig,
    db, error,
    handlers::health,
    middleware::AppState,
    routes,
    services::AuthService,
    telemetry,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("auth-service {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    if let Ok(profile) = std::env::var("AUTH_ENV") {
        dotenv::from_filename(format!(".env.{}", profile)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置（缺失签名密钥在这里直接失败）
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);
    error::set_expose_detail(config.is_development());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Auth service starting...");

    // 3. 数据库连接池（惰性）+ 迁移
    // 迁移失败不终止进程：池按需重连，在存储恢复前请求以 500 失败
    let db_pool = db::create_pool(&config.database)?;
    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Database migrations failed, continuing with lazy pool: {}", e);
    }

    // 4. 构建应用状态
    let token_service = Arc::new(TokenService::from_config(&config)?);
    let hasher = PasswordHasher::new(config.security.bcrypt_cost);
    let auth_svc = Arc::new(AuthService::new(db_pool.clone(), token_service.clone(), hasher));

    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: db_pool,
        auth_service: auth_svc,
        token_service,
    });

    // 5. 构建路由
    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 7. 优雅关闭：收到信号后排空连接，超时则强制退出
    let shutdown_started = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_started.clone()))
        .into_future();

    let deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(std::time::Duration::from_secs(
            config.server.graceful_shutdown_timeout_secs,
        ))
        .await;
    };

    tokio::select! {
        result = server => result?,
        _ = deadline => {
            tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        }
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(started: Arc<Notify>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    started.notify_one();
}

/// 打印帮助信息
fn print_help() {
    println!("auth-service {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: auth-service [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --version     Print version and exit");
    println!("  --help        Print this help and exit");
    println!();
    println!("Environment:");
    println!("  All configuration is read from AUTH_* environment variables.");
    println!("  See .env.example for the available options.");
}
