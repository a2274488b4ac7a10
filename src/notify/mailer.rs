use super::{looks_like_html, render_html};
use crate::config::EmailConfig;
use crate::error::MailError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;

/// Content-ID of the inline post illustration.
const IMAGE_CID: &str = "post-image";

/// Outbound mail over an SMTP relay. This is the one pipeline component
/// whose failures propagate loudly: a silently dropped mail defeats the
/// point of the automation.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn send(
        &self,
        subject: &str,
        body: &str,
        image_path: Option<&Path>,
    ) -> Result<(), MailError> {
        self.ensure_configured()?;
        let message = self.build_message(subject, body, image_path)?;

        let relay = if self.config.smtp_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
        } else {
            Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host))
        }
        .map_err(|e| MailError::Delivery(e.to_string()))?;

        let transport = relay
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport
            .send(&message)
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        Ok(())
    }

    fn ensure_configured(&self) -> Result<(), MailError> {
        for (value, name) in [
            (&self.config.smtp_host, "smtp_host"),
            (&self.config.username, "username"),
            (&self.config.password, "password"),
            (&self.config.from_address, "from_address"),
            (&self.config.to_address, "to_address"),
        ] {
            if value.trim().is_empty() {
                return Err(MailError::Missing(name.to_string()));
            }
        }
        Ok(())
    }

    /// Assemble the MIME message: HTML body, with the illustration inlined
    /// via a `cid:` reference when present.
    pub fn build_message(
        &self,
        subject: &str,
        body: &str,
        image_path: Option<&Path>,
    ) -> Result<Message, MailError> {
        let from: Mailbox = self
            .config
            .from_address
            .parse()
            .map_err(|e| MailError::Build(format!("from address: {e}")))?;
        let to: Mailbox = self
            .config
            .to_address
            .parse()
            .map_err(|e| MailError::Build(format!("to address: {e}")))?;

        let mut html = if looks_like_html(body) {
            body.to_string()
        } else {
            render_html(body)
        };

        let builder = Message::builder().from(from).to(to).subject(subject);

        let image_bytes = match image_path {
            Some(path) => match fs::read(path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    // A missing illustration downgrades the mail, it does
                    // not block it.
                    tracing::warn!(path = %path.display(), error = %e, "inline image unreadable, sending without it");
                    None
                }
            },
            None => None,
        };

        let message = if let Some(bytes) = image_bytes {
            html = inject_image_reference(&html);
            let png = ContentType::parse("image/png")
                .map_err(|e| MailError::Build(e.to_string()))?;
            let image_part = Attachment::new_inline(IMAGE_CID.to_string()).body(bytes, png);
            builder.multipart(
                MultiPart::related()
                    .singlepart(SinglePart::html(html))
                    .singlepart(image_part),
            )
        } else {
            builder.singlepart(SinglePart::html(html))
        };

        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

/// Splice an `<img>` for the inline attachment into the HTML body, before
/// `</body>` when one exists, appended otherwise.
fn inject_image_reference(html: &str) -> String {
    let img = format!("<img src=\"cid:{IMAGE_CID}\" alt=\"post illustration\"><br>\n");
    match html.rfind("</body>") {
        Some(idx) => {
            let mut out = html.to_string();
            out.insert_str(idx, &img);
            out
        }
        None => format!("{html}\n{img}"),
    }
}
