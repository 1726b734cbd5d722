// src/handlers.rs

pub mod auth;
pub mod parts;
pub mod rbac;
pub mod stock_take;
