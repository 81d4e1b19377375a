//! HTTP transport: routes and server.

pub mod routes;
mod server;

pub use routes::routes;
pub use server::{ServerConfig, serve};
