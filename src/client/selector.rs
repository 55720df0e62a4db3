use tracing::debug;

use crate::models::{FileId, PendingFile};
use crate::services::validation::{ValidationError, ValidationRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    #[default]
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
}

/// Emitted whenever the selection changes. `files` is `None` once the
/// selection is empty.
#[derive(Debug, Clone)]
pub struct SelectionChange {
    pub name: String,
    pub files: Option<Vec<PendingFile>>,
}

/// Buffers the files a user picked, validating each batch before it is
/// accepted.
#[derive(Debug, Clone)]
pub struct FileSelector {
    name: String,
    mode: UploadMode,
    rule: ValidationRule,
    files: Vec<PendingFile>,
    last_error: Option<String>,
    drag_active: bool,
}

impl FileSelector {
    pub fn new(name: impl Into<String>, mode: UploadMode, rule: ValidationRule) -> Self {
        Self {
            name: name.into(),
            mode,
            rule,
            files: Vec::new(),
            last_error: None,
            drag_active: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn rule(&self) -> &ValidationRule {
        &self.rule
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Value for the file input's `accept` attribute.
    pub fn accept_attribute(&self) -> String {
        self.rule.accept_attribute()
    }

    /// Validates the whole batch, stopping at the first invalid file. Nothing
    /// from a rejected batch is kept.
    ///
    /// An empty batch (e.g. a cancelled browse dialog) leaves the selection
    /// untouched.
    pub fn select(&mut self, batch: Vec<PendingFile>) -> Result<SelectionChange, ValidationError> {
        if let Some(err) = batch.iter().find_map(|f| self.rule.validate(f).err()) {
            debug!(field = %self.name, error = %err, "Rejected file batch");
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        if batch.is_empty() {
            return Ok(self.change());
        }

        match self.mode {
            UploadMode::Single => {
                self.files = batch.into_iter().take(1).collect();
            }
            UploadMode::Multi => self.files.extend(batch),
        }
        self.last_error = None;
        Ok(self.change())
    }

    /// Click-to-browse input.
    pub fn browse(&mut self, batch: Vec<PendingFile>) -> Result<SelectionChange, ValidationError> {
        self.select(batch)
    }

    /// Drag-and-drop input.
    pub fn drop_files(&mut self, batch: Vec<PendingFile>) -> Result<SelectionChange, ValidationError> {
        self.drag_active = false;
        self.select(batch)
    }

    pub fn drag(&mut self, event: DragEvent) {
        self.drag_active = matches!(event, DragEvent::Enter | DragEvent::Over);
    }

    pub fn remove(&mut self, id: FileId) -> SelectionChange {
        self.files.retain(|f| f.id() != id);
        self.change()
    }

    fn change(&self) -> SelectionChange {
        SelectionChange {
            name: self.name.clone(),
            files: if self.files.is_empty() {
                None
            } else {
                Some(self.files.clone())
            },
        }
    }
}
