//! Authentication and Authorization
//!
//! This module contains:
//! - Access tokens and bearer token verification
//! - The auth policy evaluator applied to every tool call

pub mod policy;
pub mod token;

pub use policy::{evaluate, AuthDecision, AuthDenial, AuthRequest};
pub use token::{AccessToken, StaticTokenVerifier, TokenVerifier};
