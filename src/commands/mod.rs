pub mod autostart;
pub mod clear;
pub mod create;
pub mod delete;
pub mod edit;
pub mod export;
pub mod health;
pub mod import;
pub mod inbox;
pub mod init;
pub mod list;
pub mod mv;
pub mod pull;
pub mod show;
pub mod stats;
pub mod sweep;
