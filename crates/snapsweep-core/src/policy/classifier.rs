/// Image classification by file extension.
///
/// The extension set is the single source of truth: supporting a new
/// format means adding it to [`IMAGE_EXTENSIONS`] (or passing a custom set
/// to [`ImageClassifier::with_extensions`]).
use compact_str::CompactString;
use std::path::Path;

/// Supported image extensions, lowercase, without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "ico", "heic", "raw", "cr2",
    "nef", "orf", "sr2",
];

/// Longest extension the classifier will lowercase on the stack.
const MAX_EXTENSION_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct ImageClassifier {
    extensions: Vec<CompactString>,
}

impl Default for ImageClassifier {
    fn default() -> Self {
        Self::with_extensions(IMAGE_EXTENSIONS.iter().copied())
    }
}

impl ImageClassifier {
    /// Build a classifier over a custom extension set.
    ///
    /// Entries may be given with or without a leading dot and in any case.
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set: Vec<CompactString> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
                continue;
            }
            let ext = CompactString::new(ext);
            if !set.contains(&ext) {
                set.push(ext);
            }
        }
        Self { extensions: set }
    }

    pub fn extensions(&self) -> &[CompactString] {
        &self.extensions
    }

    /// True when the file's extension (case-insensitive) is in the set.
    pub fn is_image(&self, file_name: &Path) -> bool {
        extension_of(file_name)
            .map(|ext| self.extensions.iter().any(|e| e.as_str() == ext.as_str()))
            .unwrap_or(false)
    }
}

/// Lowercased extension of `path`, or `None` when it has none or is
/// longer than any supported extension.
///
/// Lowercasing goes through a fixed stack buffer, so rejecting a
/// non-image never allocates.
pub fn extension_of(path: &Path) -> Option<CompactString> {
    let ext = path.extension()?.to_str()?;
    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_EXTENSION_LEN {
        return None;
    }

    let mut lower = [0u8; MAX_EXTENSION_LEN];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    std::str::from_utf8(&lower[..bytes.len()])
        .ok()
        .map(CompactString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_extension_is_an_image() {
        let c = ImageClassifier::default();
        for ext in IMAGE_EXTENSIONS {
            let name = format!("photo.{ext}");
            assert!(c.is_image(Path::new(&name)), "expected image for .{ext}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = ImageClassifier::default();
        assert!(c.is_image(Path::new("IMG_0001.JPG")));
        assert!(c.is_image(Path::new("scan.TiF")));
        assert!(c.is_image(Path::new("/a/b/Shot.HEIC")));
    }

    #[test]
    fn non_images_are_rejected() {
        let c = ImageClassifier::default();
        assert!(!c.is_image(Path::new("notes.txt")));
        assert!(!c.is_image(Path::new("clip.mp4")));
        assert!(!c.is_image(Path::new("jpg")));
        assert!(!c.is_image(Path::new(".jpg")));
        assert!(!c.is_image(Path::new("archive.jpg.zip")));
    }

    /// Only the suffix counts: "jpeg" inside the stem is irrelevant.
    #[test]
    fn suffix_only() {
        let c = ImageClassifier::default();
        assert!(!c.is_image(Path::new("jpeg-notes.md")));
        assert!(c.is_image(Path::new("notes.md.jpeg")));
    }

    #[test]
    fn custom_set_replaces_default() {
        let c = ImageClassifier::with_extensions([".AVIF", "jxl", ""]);
        assert!(c.is_image(Path::new("a.avif")));
        assert!(c.is_image(Path::new("b.JXL")));
        assert!(!c.is_image(Path::new("c.jpg")));
        assert_eq!(c.extensions().len(), 2);
    }

    #[test]
    fn overlong_extension_is_not_an_image() {
        let c = ImageClassifier::default();
        assert!(!c.is_image(Path::new("file.abcdefghijklmnopqrstuvwxyz")));
    }
}
