use std::error::Error;
use std::fmt;

/// Boxed underlying cause carried by an [`AcpError`].
pub type Cause = Box<dyn Error + Send + Sync + 'static>;

/// Which half of the pipeline rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A module or project description is malformed or breaks its contract
    /// (missing fields, unknown binding/value codes, duplicate names).
    Configuration,
    /// Resolution, validation or generation failed on otherwise well-formed
    /// descriptions (unknown platform, unresolved module, cyclic generators,
    /// filesystem failure, ...).
    Compilation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Compilation => write!(f, "compilation"),
        }
    }
}

/// A fatal ACP builder error.
///
/// Every failure aborts the compile. The message describes the failing step;
/// the optional cause keeps the lower-level error so callers can walk the
/// whole chain with [`AcpError::chain`] or [`Error::source`].
#[derive(Debug)]
pub struct AcpError {
    pub kind: ErrorKind,
    pub message: String,
    source: Option<Cause>,
}

impl AcpError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            message: message.into(),
            source: None,
        }
    }

    /// Create a compilation error.
    pub fn compile(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Compilation,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause.
    pub fn caused_by(mut self, cause: impl Into<Cause>) -> Self {
        self.source = Some(cause.into());
        self
    }

    pub fn is_config(&self) -> bool {
        self.kind == ErrorKind::Configuration
    }

    pub fn is_compile(&self) -> bool {
        self.kind == ErrorKind::Compilation
    }

    /// Iterate over this error and all of its causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        let mut next: Option<&(dyn Error + 'static)> = Some(self);
        std::iter::from_fn(move || {
            let current = next?;
            next = current.source();
            Some(current)
        })
    }

    /// All messages of the chain, outermost first.
    pub fn messages(&self) -> Vec<String> {
        self.chain().map(|e| e.to_string()).collect()
    }
}

impl fmt::Display for AcpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for AcpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|cause| cause as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert!(AcpError::config("x").is_config());
        assert!(AcpError::compile("x").is_compile());
        assert_eq!(AcpError::config("x").kind.to_string(), "configuration");
    }

    #[test]
    fn test_display_is_message_only() {
        let err = AcpError::compile("Unavailable module a.b")
            .caused_by(AcpError::config("inner"));
        assert_eq!(err.to_string(), "Unavailable module a.b");
    }

    #[test]
    fn test_chain_walks_all_causes() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AcpError::compile("outer")
            .caused_by(AcpError::config("middle").caused_by(io));
        assert_eq!(err.messages(), vec!["outer", "middle", "gone"]);
    }

    #[test]
    fn test_no_source_without_cause() {
        assert!(AcpError::config("x").source().is_none());
        assert_eq!(AcpError::config("x").chain().count(), 1);
    }
}
