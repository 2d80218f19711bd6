//! Tubelens REST API Library
//!
//! Provides handlers and router configuration for the channel, video and
//! trending analytics API.

pub mod handlers;
pub mod router;


pub use self::handlers::*;
pub use self::router::create_router;
