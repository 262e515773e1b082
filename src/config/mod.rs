pub mod app_config;
pub mod hosts;
pub mod proxy;
