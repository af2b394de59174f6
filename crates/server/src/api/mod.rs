pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod songs;
pub mod validation;

pub use routes::create_router;
