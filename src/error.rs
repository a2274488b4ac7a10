use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `PostPilot`.
///
/// Each pipeline stage defines its own error variant. Library callers can
/// match on these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PilotError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Post generation (completion service) ────────────────────────────
    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    // ── Image generation ────────────────────────────────────────────────
    #[error("image: {0}")]
    Image(#[from] ImageError),

    // ── Topic store ─────────────────────────────────────────────────────
    #[error("topics: {0}")]
    Store(#[from] StoreError),

    // ── Profile extraction ──────────────────────────────────────────────
    #[error("profile: {0}")]
    Profile(#[from] ProfileError),

    // ── Post archive ────────────────────────────────────────────────────
    #[error("archive: {0}")]
    Archive(#[from] ArchiveError),

    // ── Outbound mail ───────────────────────────────────────────────────
    #[error("mail: {0}")]
    Mail(#[from] MailError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("required setting missing: {0}")]
    Missing(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion request failed: {0}")]
    Remote(String),

    #[error("completion service returned no content")]
    EmptyCompletion,

    #[error("completion API key not configured")]
    MissingKey,
}

// ─── Image errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Remote(String),

    #[error("image payload could not be decoded: {0}")]
    Decode(String),

    #[error("image API key not configured")]
    MissingKey,

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Topic store errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("topic file not found: {0}")]
    NotFound(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Profile errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("export directory not found: {0}")]
    ExportMissing(String),

    #[error("csv: {0}")]
    Csv(String),
}

// ─── Archive errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Mail errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail relay not configured: {0}")]
    Missing(String),

    #[error("message build failed: {0}")]
    Build(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PilotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = PilotError::Config(ConfigError::Missing("smtp_host".into()));
        assert!(err.to_string().contains("smtp_host"));
    }

    #[test]
    fn generation_empty_displays_correctly() {
        let err = PilotError::Generation(GenerationError::EmptyCompletion);
        assert!(err.to_string().contains("no content"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let pilot_err: PilotError = anyhow_err.into();
        assert!(pilot_err.to_string().contains("something went wrong"));
    }

    #[test]
    fn mail_error_displays_correctly() {
        let err = PilotError::Mail(MailError::Delivery("relay refused".into()));
        assert!(err.to_string().contains("relay refused"));
    }

    #[test]
    fn store_io_error_wraps() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PilotError::Store(StoreError::Io(io));
        assert!(err.to_string().contains("denied"));
    }
}
