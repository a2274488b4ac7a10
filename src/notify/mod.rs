mod html;
mod mailer;

pub use html::{looks_like_html, render_html};
pub use mailer::Mailer;
