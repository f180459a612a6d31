pub mod catalog;
pub mod config;
pub mod errors;
pub mod pager;
pub mod player;
pub mod query;
pub mod tui;
