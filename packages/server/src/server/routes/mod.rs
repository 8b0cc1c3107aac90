// HTTP routes owned by the server itself (domain groups live in domains/)
pub mod health;

pub use health::*;
