use std::sync::Arc;

use crate::domain::service::Service;

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

/// Shared request state: the domain service behind an `Arc` plus the cookie
/// policy flag (secure + cross-site cookies in production).
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service>,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(service: Arc<Service>, secure_cookies: bool) -> Self {
        Self {
            service,
            secure_cookies,
        }
    }
}
