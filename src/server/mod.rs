mod alarm_routes;
mod api_error;
pub mod config;
mod frame_routes;
mod html;
mod http_layers;
mod library_routes;
pub mod metrics;
pub mod server;
pub mod state;

pub use api_error::ApiError;
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server};
pub use state::ServerState;
