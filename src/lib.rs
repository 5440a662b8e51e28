pub mod catalogue;
pub mod config;
pub mod output;
pub mod portfolio;
pub mod risk;
