pub mod error;
pub mod middleware;
pub mod protocol;
pub mod server;
pub mod stats;
pub mod storage;

pub use server::{Server, ServerConfig};
