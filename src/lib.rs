pub mod app;
pub mod config;
pub mod curation;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod news;
pub mod tui;
