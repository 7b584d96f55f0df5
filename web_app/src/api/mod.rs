//! # API Module
//!
//! Business logic of the vet records application. Each submodule handles a
//! specific domain and is called by the HTTP handlers in `front`.
//!
//! ## Modules
//!
//! - [`chat`] - AI vet conversations and reply generation
//! - [`doctor`] - Conversation summaries handed to doctors
//! - [`pet`] - Pet records with owner/vet find-or-create and cascade delete
//! - [`stats`] - Dashboard statistics
//! - [`user`] - Login

pub mod chat;
pub mod doctor;
pub mod pet;
pub mod stats;
pub mod user;
