//! 数据模型模块

pub mod user;

pub use user::{LoginForm, RegisterForm, RegisterRequest, User, UserQuery, UserResponse};
