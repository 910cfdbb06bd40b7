pub mod api;
pub mod config;
pub mod display;
pub mod http_client;
pub mod minutes;
pub mod provider;
pub mod season;
pub mod state;
