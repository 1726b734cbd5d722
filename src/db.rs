pub mod group_repo;
pub use group_repo::GroupRepository;
pub mod part_repo;
pub use part_repo::PartRepository;
pub mod stock_take_repo;
pub use stock_take_repo::StockTakeRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
