pub mod agents;
pub mod commands;
pub mod config;
pub mod error;
pub mod gamification;
pub mod inbox;
pub mod model;
pub mod output;
pub mod store;
