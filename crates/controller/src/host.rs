//! Contracts the editor host fulfills. The table never implements
//! these; it calls them at the few points where a table interaction
//! escapes the block (caret leaving the table, deleting the block,
//! label translation, image upload).

/// Editor-host services consumed by the controller.
pub trait HostApi {
    /// Translate a label key ("Merge Cells") into display text.
    fn translate(&self, key: &str) -> String;

    /// Move the caret to the edge of the neighboring block.
    fn caret_to_previous_block(&mut self);
    fn caret_to_next_block(&mut self);

    /// Index of the block this table lives in.
    fn current_block_index(&self) -> usize;

    /// Remove a block from the document.
    fn delete_block(&mut self, index: usize);
}

/// Result of a completed image upload: the final URL the model stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The endpoint refused the file (type, size, auth).
    Rejected(String),
    /// The request never completed.
    Transport(String),
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadError::Rejected(reason) => write!(f, "upload rejected: {}", reason),
            UploadError::Transport(reason) => write!(f, "upload failed: {}", reason),
        }
    }
}

impl std::error::Error for UploadError {}

/// Upload collaborator. Transport, retries and progress UI live behind
/// this trait; the table only ever sees the resulting `src`.
pub trait ImageUploader {
    fn upload(&mut self, filename: &str, bytes: &[u8]) -> Result<UploadedImage, UploadError>;
}
