pub mod config;
pub mod discord_helpers;
pub mod logging;

#[doc(hidden)]
pub use better_term;
