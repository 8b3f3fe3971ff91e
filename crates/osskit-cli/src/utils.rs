//! Utility functions for the osskit CLI

use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::path::Path;

/// Format a datetime for display
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format size as human readable
pub fn format_size(bytes: u64, human_readable: bool) -> String {
    if human_readable {
        humansize::format_size(bytes, humansize::BINARY)
    } else {
        bytes.to_string()
    }
}

/// Get content type from file extension
pub fn guess_content_type(path: &str) -> String {
    mime_guess::from_path(Path::new(path))
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Confirm an action with the user
pub fn confirm(message: &str) -> io::Result<bool> {
    print!("{} [y/N]: ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Extract filename from a path or key
pub fn extract_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Join path components (handling trailing slashes)
pub fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if prefix.ends_with('/') {
        format!("{}{}", prefix, name)
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Determine destination key when uploading a local file
pub fn determine_dest_key(source_path: &str, dest_key: Option<&str>) -> String {
    let filename = extract_filename(source_path);

    match dest_key {
        Some(key) if key.ends_with('/') => join_key(key, filename),
        Some(key) if !key.is_empty() => key.to_string(),
        _ => filename.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("file.txt"), "text/plain");
        assert_eq!(guess_content_type("image.png"), "image/png");
        assert_eq!(guess_content_type("app.json"), "application/json");
        assert_eq!(
            guess_content_type("unknown.xyz123"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1024, false), "1024");
        assert!(format_size(1024, true).contains("KiB"));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("path/to/file.txt"), "file.txt");
        assert_eq!(extract_filename("file.txt"), "file.txt");
        assert_eq!(extract_filename("/file.txt"), "file.txt");
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "file.txt"), "file.txt");
        assert_eq!(join_key("prefix", "file.txt"), "prefix/file.txt");
        assert_eq!(join_key("prefix/", "file.txt"), "prefix/file.txt");
    }

    #[test]
    fn test_determine_dest_key() {
        assert_eq!(
            determine_dest_key("/path/file.txt", Some("dest/")),
            "dest/file.txt"
        );
        assert_eq!(
            determine_dest_key("/path/file.txt", Some("dest/newname.txt")),
            "dest/newname.txt"
        );
        assert_eq!(determine_dest_key("/path/file.txt", None), "file.txt");
    }
}
