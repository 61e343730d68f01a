//! JobHive listings client: fetches the job feed, narrows and orders it for
//! display, and applies to or saves jobs for a signed-in job seeker.

pub mod api_client;
pub mod config;
pub mod errors;
pub mod listings;
pub mod models;
pub mod notice;
pub mod session;
