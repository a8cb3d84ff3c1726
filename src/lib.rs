//! Best-effort field mapping between loosely related runtime record types.

/// Runtime type model, capabilities, and the recursive copy engine.
pub mod copy;
