pub mod config;
pub mod errors;
pub mod flow;
pub mod model;
pub mod session;
