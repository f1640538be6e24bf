pub mod api;
pub mod builder;
pub mod calendar;
pub mod config;
pub mod error;
pub mod reconstruct;
pub mod schedule;
pub mod session;
pub mod slots;
pub mod time;
pub mod util;
