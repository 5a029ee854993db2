//! Bearer token authentication, sign-up, log-in and Google sign-in.

mod google;
mod log_in;
mod middleware;
mod response;
mod sign_up;
mod token;

pub use google::{GoogleIdTokenVerifier, GoogleProfile, IdTokenVerifier, sign_in_with_google};
pub use log_in::log_in;
pub use middleware::{AuthState, auth_guard};
pub use response::AuthResponse;
pub use sign_up::sign_up;
pub use token::{DEFAULT_TOKEN_DURATION, JwtKeys, decode_token, encode_token};
