use console::style;
use std::fmt::Display;

/// Green bold — success checkmarks, confirmations
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// White bold — section headers, titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim — subtitles, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Red — failure markers, error lines
pub fn error<D: Display>(text: D) -> String {
    style(text).red().to_string()
}

/// Yellow — warnings, skipped stages
pub fn warn<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green — confirmed values, paths, topics
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan bold — step numbers, menu accents
pub fn accent<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}
