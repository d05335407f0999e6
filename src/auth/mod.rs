//! Bearer-token boundary. Tokens are issued by the hosted auth service;
//! this crate only verifies them.

mod claims;
pub mod jwt;

pub use jwt::AuthUser;
