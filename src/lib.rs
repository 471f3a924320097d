pub mod app;
pub mod auth;
pub mod calls;
pub mod chat;
pub mod clients;
pub mod config;
pub mod error;
pub mod extract;
pub mod ownership;
pub mod sales;
pub mod state;
pub mod suggestions;
