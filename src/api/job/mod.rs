pub mod models;
pub mod dto;
pub mod handlers;
pub mod service;

pub use service::JobService;
