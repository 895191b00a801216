pub mod handlers;
pub mod models;
mod password;
mod service;

pub use handlers::{change_password, login, logout, me, register, update_profile};
pub use service::AuthService;
