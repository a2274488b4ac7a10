use super::GeneratedPost;
use crate::error::ArchiveError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only Markdown log of accepted posts. Entries are separated by a
/// horizontal rule; prior content is never rewritten.
pub struct PostArchive {
    path: PathBuf,
}

impl PostArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, post: &GeneratedPost) -> Result<(), ArchiveError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(ArchiveError::Io(e)),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if !existing.is_empty() {
            if !existing.ends_with('\n') {
                writeln!(file)?;
            }
            writeln!(file, "\n---\n")?;
        }

        writeln!(file, "## Post - {}", post.created_at.format("%B %d, %Y"))?;
        writeln!(file)?;
        writeln!(file, "**Topic:** {}", post.topic)?;
        if let Some(image) = &post.image_path {
            writeln!(
                file,
                "**Image:** ![{}]({})",
                post.topic,
                self.relative_image_link(image)
            )?;
        }
        writeln!(file)?;
        writeln!(file, "**Content:**")?;
        writeln!(file)?;
        writeln!(file, "{}", post.body.trim_end())?;
        Ok(())
    }

    /// Number of archived entries, for status display. An unreadable or
    /// absent file counts as zero.
    pub fn entry_count(&self) -> usize {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return 0;
        };
        content
            .lines()
            .filter(|line| line.starts_with("## "))
            .count()
    }

    /// Image links are written relative to the archive's directory when the
    /// image lives under it, so the log stays portable.
    fn relative_image_link(&self, image: &Path) -> String {
        self.path
            .parent()
            .and_then(|parent| image.strip_prefix(parent).ok())
            .unwrap_or(image)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_in_temp() -> (tempfile::TempDir, PostArchive) {
        let dir = tempfile::tempdir().unwrap();
        let archive = PostArchive::new(dir.path().join("posts.md"));
        (dir, archive)
    }

    #[test]
    fn first_append_has_no_leading_rule() {
        let (_dir, archive) = archive_in_temp();
        archive
            .append(&GeneratedPost::new("Alpha", "Body text."))
            .unwrap();

        let content = fs::read_to_string(archive.path()).unwrap();
        assert!(!content.starts_with("\n"));
        assert!(!content.contains("---"));
        assert!(content.starts_with("## Post - "));
        assert!(content.contains("**Topic:** Alpha"));
        assert!(content.contains("**Content:**"));
        assert!(content.contains("Body text."));
    }

    #[test]
    fn second_append_separates_with_exactly_one_rule() {
        let (_dir, archive) = archive_in_temp();
        archive
            .append(&GeneratedPost::new("Alpha", "First body."))
            .unwrap();
        archive
            .append(&GeneratedPost::new("Beta", "Second body."))
            .unwrap();

        let content = fs::read_to_string(archive.path()).unwrap();
        assert_eq!(content.matches("\n---\n").count(), 1);
        let rule_at = content.find("\n---\n").unwrap();
        assert!(content[..rule_at].contains("First body."));
        assert!(content[rule_at..].contains("**Topic:** Beta"));
    }

    #[test]
    fn append_never_rewrites_prior_entries() {
        let (_dir, archive) = archive_in_temp();
        archive
            .append(&GeneratedPost::new("Alpha", "First body."))
            .unwrap();
        let before = fs::read_to_string(archive.path()).unwrap();

        archive
            .append(&GeneratedPost::new("Beta", "Second body."))
            .unwrap();
        let after = fs::read_to_string(archive.path()).unwrap();
        assert!(after.starts_with(&before));
    }

    #[test]
    fn image_reference_is_relative_when_nested() {
        let (dir, archive) = archive_in_temp();
        let image = dir.path().join("images").join("2026-08-06_Alpha.png");
        let post = GeneratedPost::new("Alpha", "Body.").with_image(Some(image));
        archive.append(&post).unwrap();

        let content = fs::read_to_string(archive.path()).unwrap();
        assert!(content.contains("**Image:** ![Alpha](images/2026-08-06_Alpha.png)"));
    }

    #[test]
    fn image_line_omitted_when_absent() {
        let (_dir, archive) = archive_in_temp();
        archive
            .append(&GeneratedPost::new("Alpha", "Body."))
            .unwrap();
        let content = fs::read_to_string(archive.path()).unwrap();
        assert!(!content.contains("**Image:**"));
    }

    #[test]
    fn entry_count_tracks_appends() {
        let (_dir, archive) = archive_in_temp();
        assert_eq!(archive.entry_count(), 0);
        archive.append(&GeneratedPost::new("A", "a")).unwrap();
        archive.append(&GeneratedPost::new("B", "b")).unwrap();
        assert_eq!(archive.entry_count(), 2);
    }
}
