//! Input validation: display names, integer ranges, uploaded pictures, alert categories.

use crate::models::Category;
use std::path::Path;
use uuid::Uuid;

/// Longest accepted tournament or player name.
pub const MAX_NAME_LEN: usize = 100;

/// Extensions accepted for player pictures (lower case, with dot).
pub const ALLOWED_IMAGE_EXTS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Decoded picture formats we accept.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

/// Trim and check a display name. Returns None if it is empty, too long, or
/// contains anything other than ASCII letters, digits, space, `_`, `-` and `.`.
pub fn sanitize_name(raw: &str, max_len: usize) -> Option<String> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > max_len {
        return None;
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-' | '.');
    if !name.chars().all(allowed) {
        return None;
    }
    Some(name.to_string())
}

pub fn clamp_int(value: i64, min: i64, max: i64) -> i64 {
    value.clamp(min, max)
}

/// Map a free-form category string to a known one; anything unknown is info.
pub fn alert_category(raw: &str) -> Category {
    match raw.trim().to_ascii_lowercase().as_str() {
        "warning" => Category::Warning,
        "error" | "danger" => Category::Error,
        _ => Category::Info,
    }
}

/// Sniff the picture format from its leading bytes.
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(ImageFormat::Jpeg)
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(ImageFormat::Png)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(ImageFormat::Gif)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

/// Lower-cased extension of `filename` including the dot, if it is on the allow-list.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    let ext = format!(".{ext}");
    ALLOWED_IMAGE_EXTS.contains(&ext.as_str()).then_some(ext)
}

/// An upload is acceptable when both its extension and its content are allowed picture types.
pub fn is_allowed_image(filename: &str, bytes: &[u8]) -> bool {
    allowed_extension(filename).is_some() && detect_image_format(bytes).is_some()
}

/// Fresh storage name for an accepted upload, keeping its extension.
pub fn stored_image_name(filename: &str) -> Option<String> {
    allowed_extension(filename).map(|ext| format!("{}{}", Uuid::new_v4().simple(), ext))
}
