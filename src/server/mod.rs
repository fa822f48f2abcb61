pub mod route_builder;

pub use route_builder::{build_router, build_state, register_routes};
