pub mod auth;
pub mod handlers;
pub mod render;
pub mod routes;

pub use auth::*;
pub use handlers::*;
pub use routes::*;
