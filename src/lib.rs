pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod pipeline;
pub mod table;
