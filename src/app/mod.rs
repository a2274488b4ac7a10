mod dispatch;
pub mod interactive;
pub mod oneshot;
pub mod pipeline;
pub mod status;

pub use dispatch::dispatch;
pub use interactive::{ReviewAction, ReviewPrompt, run_review};
