//! Unified error types for veneer.
//!
//! Two phase-specific error enums plus a top-level wrapper:
//!
//! ```text
//! VeneerError (top-level wrapper)
//! ├── RegistryError - host setup defects (registration time)
//! └── ExpandError   - expansion failures (rewrite time)
//! ```
//!
//! Every expansion failure is fatal to the `expand` call that hit it: the
//! engine never returns a partially expanded tree.

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the type model or the factory table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// A type with this identity was already registered.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A member with this signature was already declared on the type.
    #[error("duplicate member: '{member}' on type '{type_name}'")]
    DuplicateMember {
        /// The declaring type.
        type_name: String,
        /// The duplicated member name.
        member: String,
    },

    /// An expression factory was already registered under this key.
    #[error("duplicate expression factory: {0}")]
    DuplicateFactory(String),

    /// An inline body provider with this name was already registered on the
    /// type.
    #[error("duplicate inline body: '{name}' on type '{type_name}'")]
    DuplicateInlineBody {
        /// The declaring type.
        type_name: String,
        /// The duplicated provider name.
        name: String,
    },

    /// A referenced type was not found in the model.
    #[error("type not found: {0}")]
    TypeNotFound(String),
}

// ============================================================================
// Expansion Errors
// ============================================================================

/// Errors raised by the expansion engine.
///
/// All of these indicate defects in the host setup or in the registered
/// bodies, not normal runtime conditions; none is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpandError {
    /// The member carries an expansion marker but neither a generated
    /// factory nor a valid inline body could be found. Indicates a host-side
    /// code-generation omission.
    #[error("unable to resolve generated expression for {member}")]
    UnresolvedVirtualMember {
        /// Fully-qualified member name.
        member: String,
    },

    /// A use-site's argument count disagrees with the resolved body's
    /// parameter count. Indicates a resolver contract violation.
    #[error("{member} expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// Fully-qualified member name.
        member: String,
        /// Non-receiver parameter count of the resolved body.
        expected: usize,
        /// Argument count supplied at the use-site.
        got: usize,
    },

    /// A member's expansion transitively re-invoked itself.
    #[error("expansion cycle detected: {}", chain.join(" -> "))]
    ExpansionCycle {
        /// The member chain, outermost first, ending with the re-entered
        /// member.
        chain: Vec<String>,
    },
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// The unified error type for all veneer operations.
///
/// Each variant uses `#[from]` to enable automatic conversion with the `?`
/// operator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VeneerError {
    /// A registration error.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An expansion error.
    #[error(transparent)]
    Expand(#[from] ExpandError),
}

impl VeneerError {
    /// Check if this is a registration error.
    pub fn is_registry(&self) -> bool {
        matches!(self, VeneerError::Registry(_))
    }

    /// Check if this is an expansion error.
    pub fn is_expand(&self) -> bool {
        matches!(self, VeneerError::Expand(_))
    }
}
