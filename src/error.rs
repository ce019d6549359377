//! Error taxonomy shared by both codecs and the model registry.

/// Errors raised while importing, exporting or mutating a topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// Malformed header, number, coordinate or attribute value.
    #[error("Format error in {context}: {message}")]
    Format { context: String, message: String },

    /// A link endpoint names a node that is not (yet) in the topology.
    #[error("Unknown node reference '{id}'")]
    UnknownNodeReference { id: String },

    /// The model registry has no binding for the requested name.
    #[error("Unknown node model '{name}'")]
    UnknownModel { name: String },

    /// A required XML attribute is absent.
    #[error("Missing required attribute '{field}' on <{element}>")]
    MissingField { element: String, field: &'static str },

    #[error("Duplicate node identifier '{id}'")]
    DuplicateNode { id: String },

    #[error("Invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        TopologyError::Format {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;

/// A per-entity problem found during import. The offending node or link is
/// skipped and the import carries on.
#[derive(Debug)]
pub struct Diagnostic {
    /// 1-based line number for plain text, element position for XML.
    pub line: usize,
    pub error: TopologyError,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Outcome of a successful import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Record a per-entity failure, or return it when `strict` is set.
    pub(crate) fn push(&mut self, line: usize, error: TopologyError, strict: bool) -> Result<()> {
        if strict {
            return Err(error);
        }
        log::warn!("Skipping entity at line {}: {}", line, error);
        self.diagnostics.push(Diagnostic { line, error });
        Ok(())
    }
}

/// Knobs for the import entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Treat every per-entity diagnostic as fatal.
    pub strict: bool,
}

impl ImportOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}
