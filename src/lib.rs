pub mod config;
pub mod db;
pub mod import;
pub mod models;
pub mod parser;
