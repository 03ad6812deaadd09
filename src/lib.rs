pub mod config;
pub mod error;
pub mod notifier;
pub mod poller;
pub mod response;
pub mod status_api;
pub mod verdict;
