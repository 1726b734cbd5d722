// src/services.rs

pub mod auth;
pub mod part_rules;
pub mod part_service;
pub mod rbac_service;
pub mod stock_take_service;

pub use auth::AuthService;
pub use part_service::PartService;
pub use rbac_service::RbacService;
pub use stock_take_service::StockTakeService;
