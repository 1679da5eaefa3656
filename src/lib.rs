pub mod asset;
pub mod config;
pub mod github;
pub mod http;
pub mod runtime;
pub mod site;
