//! 数据库访问层

pub mod user_repo;

pub use user_repo::UserRepository;
