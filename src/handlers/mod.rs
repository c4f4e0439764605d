// src/handlers/mod.rs

pub mod blogs;
pub mod root;
pub mod users;
