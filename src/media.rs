//! Upload kind classification.
//!
//! Telegram distinguishes photo, video and generic document uploads; the
//! choice here is a pure function of the file extension.

use std::path::Path;

/// How a downloaded file should be uploaded to the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// `.jpg`, `.jpeg`, `.png`, `.webp`, `.gif`
    Photo,
    /// `.mp4`, `.mkv`, `.webm`, `.mov`
    Video,
    /// Everything else
    Document,
}

impl UploadKind {
    /// Classify a file by its extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("jpg" | "jpeg" | "png" | "webp" | "gif") => Self::Photo,
            Some("mp4" | "mkv" | "webm" | "mov") => Self::Video,
            _ => Self::Document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_extensions() {
        for name in ["a.jpg", "b.jpeg", "c.png", "d.webp", "e.gif"] {
            assert_eq!(UploadKind::from_path(Path::new(name)), UploadKind::Photo);
        }
    }

    #[test]
    fn test_video_extensions() {
        for name in ["a.mp4", "b.mkv", "c.webm", "d.mov"] {
            assert_eq!(UploadKind::from_path(Path::new(name)), UploadKind::Video);
        }
    }

    #[test]
    fn test_everything_else_is_a_document() {
        for name in ["sound.mp3", "notes.txt", "archive", "weird.jpg.bak"] {
            assert_eq!(UploadKind::from_path(Path::new(name)), UploadKind::Document);
        }
    }

    #[test]
    fn test_extension_case_is_ignored() {
        assert_eq!(UploadKind::from_path(Path::new("A.JPG")), UploadKind::Photo);
        assert_eq!(UploadKind::from_path(Path::new("B.Mp4")), UploadKind::Video);
    }
}
