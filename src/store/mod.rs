pub mod board;
pub mod cache;
pub mod lock;
