#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod images;
pub mod notify;
pub mod post;
pub mod profile;
pub mod prompt;
pub mod providers;
pub mod topics;
pub mod ui;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use error::{PilotError, Result};
