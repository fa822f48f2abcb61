pub mod activity;
pub mod report;
