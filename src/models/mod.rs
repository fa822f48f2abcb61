pub mod activity;
pub mod login_attempt;
pub mod session;
pub mod user;
