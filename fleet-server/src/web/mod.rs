//! Web layer for the fleet route planner.
//!
//! JSON endpoints for geocoding, route estimates, trip planning and live
//! tracking.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppPlanner, AppState, StartupError};
