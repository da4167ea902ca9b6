//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, trace span)
//!     → handlers.rs (relay, generate, greet, health)
//!     → response.rs (error mapping to JSON bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
