pub mod actors;
pub mod backend;
pub mod cli;
pub mod debounce;
pub mod display;
pub mod error;
pub mod github;
pub mod models;
pub mod notice;
pub mod rate_limit;
pub mod session;
pub mod store;
pub mod types;
