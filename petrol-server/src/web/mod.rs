//! Web layer for the station finder.
//!
//! Serves the HTML frontend and a JSON API over the live station list.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
