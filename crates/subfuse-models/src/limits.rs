//! Size ceilings and accepted upload formats.

/// Largest video accepted for processing, checked before and after transfer.
pub const MAX_VIDEO_BYTES: u64 = 20 * 1024 * 1024;

/// Largest logo image accepted.
pub const MAX_LOGO_BYTES: u64 = 5 * 1024 * 1024;

/// Smallest plausible encoder output; anything below this is treated as a
/// failed render.
pub const MIN_OUTPUT_BYTES: u64 = 10 * 1024;

pub const ALLOWED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "flv"];

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Case-insensitive extension check against an allow list.
pub fn extension_allowed(file_name: &str, allowed: &[&str]) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            allowed.iter().any(|a| *a == ext)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_allowed() {
        assert!(extension_allowed("clip.MP4", ALLOWED_VIDEO_EXTENSIONS));
        assert!(extension_allowed("logo.jpeg", ALLOWED_IMAGE_EXTENSIONS));
        assert!(!extension_allowed("logo.gif", ALLOWED_IMAGE_EXTENSIONS));
        assert!(!extension_allowed("noext", ALLOWED_VIDEO_EXTENSIONS));
    }

    #[test]
    fn test_limit_values() {
        assert_eq!(MAX_VIDEO_BYTES, 20 * 1024 * 1024);
        assert_eq!(MAX_LOGO_BYTES, 5 * 1024 * 1024);
        assert!(MIN_OUTPUT_BYTES < MAX_VIDEO_BYTES);
    }
}
