//! Authentication Handlers
//!
//! Signup, login, and current-user endpoints. These are the only routes that
//! touch the user store directly; everything else proxies upstream.

pub mod login;
pub mod me;
pub mod signup;
pub mod types;

pub use login::login;
pub use me::get_me;
pub use signup::signup;
