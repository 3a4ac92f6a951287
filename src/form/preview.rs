//! Attachments and their previews.
//!
//! An image attachment is written to a scoped temporary file whose path can
//! be handed to an external viewer. The file is removed as soon as the
//! preview is dropped, which happens when the slot is cleared or replaced
//! and when the form itself goes away.

use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const OCTET_STREAM: &str = "application/octet-stream";
pub const PDF: &str = "application/pdf";

/// A file picked for an attachment slot.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Attachment {
    /// Build an attachment, sniffing the content type from the bytes and name.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = sniff_content_type(&bytes, &file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an attachment from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Guess a content type from magic bytes, then from the file extension.
pub fn sniff_content_type(bytes: &[u8], file_name: &str) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"%PDF-", PDF),
    ];

    if let Some(mime) = SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
    {
        return mime;
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    // BMP: "BM", then a 4-byte file size and two zeroed reserved words
    if bytes.len() >= 14 && bytes.starts_with(b"BM") && bytes[6..10] == [0, 0, 0, 0] {
        return "image/bmp";
    }

    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "pdf" => PDF,
        "txt" => "text/plain",
        "zip" => "application/zip",
        _ => OCTET_STREAM,
    }
}

/// Scoped temporary copy of an image attachment.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    fn create(attachment: &Attachment) -> io::Result<Self> {
        let suffix = Path::new(&attachment.file_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let mut file = tempfile::Builder::new()
            .prefix("archdesk-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&attachment.bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Path a viewer can open while the handle is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Generic,
}

/// Lightweight description of an attachment's content.
#[derive(Debug)]
pub enum Preview {
    Image(PreviewHandle),
    PdfMarker,
    GenericMarker,
}

impl Preview {
    /// Derive the preview for an attachment from its content type.
    pub fn for_attachment(attachment: &Attachment) -> io::Result<Self> {
        if attachment.is_image() {
            Ok(Preview::Image(PreviewHandle::create(attachment)?))
        } else if attachment.is_pdf() {
            Ok(Preview::PdfMarker)
        } else {
            Ok(Preview::GenericMarker)
        }
    }

    pub fn kind(&self) -> PreviewKind {
        match self {
            Preview::Image(_) => PreviewKind::Image,
            Preview::PdfMarker => PreviewKind::Pdf,
            Preview::GenericMarker => PreviewKind::Generic,
        }
    }

    /// One-line text shown under the slot.
    pub fn describe(&self) -> String {
        match self {
            Preview::Image(handle) => format!("Image preview: {}", handle.path().display()),
            Preview::PdfMarker => "PDF Preview Available".to_string(),
            Preview::GenericMarker => "File uploaded".to_string(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn test_sniff_by_magic_bytes() {
        assert_eq!(sniff_content_type(PNG_BYTES, "noext"), "image/png");
        assert_eq!(sniff_content_type(b"\xff\xd8\xff\xe0", "x.bin"), "image/jpeg");
        assert_eq!(sniff_content_type(b"%PDF-1.7\n", "scan"), PDF);
        assert_eq!(sniff_content_type(b"RIFF\0\0\0\0WEBPVP8 ", "a"), "image/webp");
    }

    #[test]
    fn test_sniff_bmp_header() {
        let bmp = b"BM\x46\0\0\0\0\0\0\0\x36\0\0\0";
        assert_eq!(sniff_content_type(bmp, "scan"), "image/bmp");
        assert_eq!(sniff_content_type(b"BMW site visit notes", "notes"), OCTET_STREAM);
    }

    #[test]
    fn test_sniff_falls_back_to_extension() {
        assert_eq!(sniff_content_type(b"", "plan.PDF"), PDF);
        assert_eq!(sniff_content_type(b"<svg/>", "logo.svg"), "image/svg+xml");
        assert_eq!(sniff_content_type(b"\0\x01", "model.skp"), OCTET_STREAM);
    }

    #[test]
    fn test_preview_kinds() {
        let png = Attachment::new("front.png", PNG_BYTES.to_vec());
        assert_eq!(Preview::for_attachment(&png).unwrap().kind(), PreviewKind::Image);

        let pdf = Attachment::new("plan.pdf", b"%PDF-1.4".to_vec());
        assert_eq!(Preview::for_attachment(&pdf).unwrap().kind(), PreviewKind::Pdf);

        let other = Attachment::new("model.skp", vec![1, 2, 3]);
        assert_eq!(Preview::for_attachment(&other).unwrap().kind(), PreviewKind::Generic);
    }

    #[test]
    fn test_image_handle_is_released_on_drop() {
        let png = Attachment::new("front.png", PNG_BYTES.to_vec());
        let preview = Preview::for_attachment(&png).unwrap();
        let path = match &preview {
            Preview::Image(handle) => handle.path().to_path_buf(),
            other => panic!("expected image preview, got {other:?}"),
        };
        assert_eq!(std::fs::read(&path).unwrap(), PNG_BYTES);
        assert!(path.to_string_lossy().ends_with(".png"));

        drop(preview);
        assert!(!path.exists());
    }

    #[test]
    fn test_attachment_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("elevation.pdf");
        std::fs::write(&path, b"%PDF-1.5").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();
        assert_eq!(attachment.file_name, "elevation.pdf");
        assert!(attachment.is_pdf());
        assert_eq!(attachment.size(), 8);

        assert!(Attachment::from_path(&dir.path().join("missing.png")).is_err());
    }
}
