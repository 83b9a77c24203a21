//! Gateway server implementation

mod router;
mod server;

pub use router::{AppState, ApiError, WEATHER_PATH, WeatherQuery, create_router, validate_city};
pub use server::Gateway;
