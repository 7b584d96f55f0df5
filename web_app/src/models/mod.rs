pub mod chat;
pub mod contact;
pub mod pet;
pub mod user_app;
