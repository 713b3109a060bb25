//! Application error type.
//!
//! Every whole-dataset failure is an `AppError`: a kind from the load taxonomy,
//! a process exit code derived from that kind, and a human-readable message.
//! Row-level failures never become an `AppError`; see `schema::RecordError`.

/// Classification of whole-dataset failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-success HTTP status or transport failure while fetching the archive.
    Network,
    /// The archive cannot be extracted or holds no geometry file.
    Archive,
    /// The geometry file (or one of its sidecars) cannot be parsed.
    Parse,
    /// Validation was asked to run over zero rows.
    EmptyDataset,
    /// Local filesystem failure outside of archive handling (exports, local archives).
    Io,
    /// Invalid configuration (tolerance out of range, bad env value, ...).
    Config,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config | ErrorKind::Io => 2,
            ErrorKind::EmptyDataset => 3,
            ErrorKind::Network => 4,
            ErrorKind::Archive => 5,
            ErrorKind::Parse => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Network => "network error",
            ErrorKind::Archive => "archive error",
            ErrorKind::Parse => "parse error",
            ErrorKind::EmptyDataset => "empty dataset",
            ErrorKind::Io => "io error",
            ErrorKind::Config => "configuration error",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn archive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Archive, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn empty_dataset(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyDataset, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
