// Service exports
pub mod ai;
pub mod auth;
pub mod profiles;

pub use ai::{AiClient, AiError};
pub use auth::{AuthError, AuthService, AuthSession, Claims};
pub use profiles::{ProfileStore, StoredProfile};
