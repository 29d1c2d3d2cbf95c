pub mod app_bus;
pub mod command_handlers;
pub mod config;
pub mod cqrs;
pub mod images;
pub mod queries_handlers;
pub mod repository;
pub mod test_utils;
pub mod uow;
pub mod validation;
