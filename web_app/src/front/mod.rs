pub mod auth;
pub mod chat;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod pet;
pub mod routes;
pub mod server;

use crate::{repo, services};

pub struct AppState {
    pub repo: repo::ImplAppRepo,
    pub reply_chain: services::ReplyChain,
}
