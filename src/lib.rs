pub mod api;
pub mod config;
pub mod db;
pub mod decision;
pub mod error;
pub mod readings;
pub mod rooms;
pub mod weather;
