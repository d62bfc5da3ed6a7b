//! Output page kind.

/// What produced an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    /// Standalone page: always rendered and written.
    #[default]
    Page,
    /// Collection document: only written when its collection has output.
    Document {
        /// Whether the document is written to the output directory.
        write: bool,
    },
}

impl PageKind {
    /// Check if this page ends up in the output directory.
    #[inline]
    pub fn is_written(&self) -> bool {
        match self {
            Self::Page => true,
            Self::Document { write } => *write,
        }
    }
}
