pub mod routes;
pub mod startup;
pub mod errors;
pub mod observability;

pub use startup::{build_app, load_config, serve, serve_listener, shutdown_signal};
