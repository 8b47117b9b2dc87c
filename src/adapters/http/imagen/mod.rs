//! Image micro-service HTTP adapter.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;

pub use handlers::ImagenAppState;
pub use routes::imagen_router;
