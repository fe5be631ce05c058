pub mod cache;
pub mod config;
pub mod map;
pub mod replay;
pub mod route;
pub mod sensitivity;
