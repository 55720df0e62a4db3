use bytes::Bytes;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// Identity of one selected file, independent of its name or contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An in-memory file awaiting submission.
///
/// Cloning shares the underlying bytes and keeps the same [`FileId`], so a
/// clone handed to the submission layer still identifies the selected file.
#[derive(Debug, Clone)]
pub struct PendingFile {
    id: FileId,
    pub name: String,
    pub mime_type: String,
    pub size: usize,
    content: Bytes,
}

impl PendingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            id: FileId::new(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: content.len(),
            content,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn bytes(&self) -> &Bytes {
        &self.content
    }

    /// Upper-cased extension shown next to the file in a selection list.
    pub fn extension_label(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }

    /// Size in kilobytes, two decimals.
    pub fn size_kb(&self) -> String {
        format!("{:.2} KB", self.size as f64 / 1024.0)
    }

    /// Final path component of the declared name, so a crafted name such as
    /// `../../etc/passwd` cannot escape the staging directory.
    pub fn safe_name(&self) -> String {
        Path::new(&self.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string())
    }
}
