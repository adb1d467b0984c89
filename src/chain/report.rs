use std::cell::RefCell;
use std::fmt;
use tracing::warn;

/// A non-fatal condition met while assembling an adapter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainWarning {
    /// The adapter's persona is not trained; the adapter was left out of the chain.
    Untrained { name: String },
    /// The adapter is marked trained but names no adapter file.
    MissingAdapterFile { name: String },
    /// No persona record exists for the requested id.
    MissingPersona { id: String },
}

impl ChainWarning {
    pub fn subject(&self) -> &str {
        match self {
            ChainWarning::Untrained { name } | ChainWarning::MissingAdapterFile { name } => name,
            ChainWarning::MissingPersona { id } => id,
        }
    }
}

impl fmt::Display for ChainWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainWarning::Untrained { name } => write!(f, "{} not trained, skipping", name),
            ChainWarning::MissingAdapterFile { name } => {
                write!(f, "{} has no adapter file, skipping", name)
            }
            ChainWarning::MissingPersona { id } => write!(f, "{} not found, skipping", id),
        }
    }
}

/// Receives warnings from graph construction.
pub trait Reporter {
    fn warn(&self, warning: &ChainWarning);
}

impl<F> Reporter for F
where
    F: Fn(&ChainWarning),
{
    fn warn(&self, warning: &ChainWarning) {
        self(warning)
    }
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, warning: &ChainWarning) {
        warn!(subject = warning.subject(), "{}", warning);
    }
}

/// Keeps every warning it receives, in order.
///
/// Single-threaded; give each thread its own reporter and [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Default)]
pub struct CollectingReporter {
    warnings: RefCell<Vec<ChainWarning>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<ChainWarning> {
        self.warnings.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn warn(&self, warning: &ChainWarning) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}
