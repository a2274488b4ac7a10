mod loader;
mod schema;

pub use schema::{Config, EmailConfig, ImageConfig, PathsConfig, ProviderConfig};
