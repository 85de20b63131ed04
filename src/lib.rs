pub mod api;
pub mod cli;
pub mod core;
pub mod portal;
pub mod rooms;
