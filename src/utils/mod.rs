pub mod error;
pub mod escape;
pub mod helpers;
pub mod jwt;
