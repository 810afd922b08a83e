pub mod auth_request;

pub use auth_request::{ForgotPasswordRequest, LocalLoginRequest, RegisterRequest, ResetPasswordRequest};
