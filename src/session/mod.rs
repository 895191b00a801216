pub mod handlers;
pub mod models;
mod store;

pub use handlers::{clear_session, get_session, get_settings, update_settings};
pub use store::SessionStore;
