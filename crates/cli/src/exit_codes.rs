//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 60-69   | reconcile/lookup | Catalog and reconciliation codes         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconcile / lookup (60-69)
// =============================================================================

/// Config file unreadable or invalid, or catalog settings incomplete.
pub const EXIT_CONFIG_INVALID: u8 = 60;

/// Credential acquisition failed (token endpoint refused or unreachable).
pub const EXIT_CREDENTIAL: u8 = 61;

/// Request JSON or discrepancy CSV could not be parsed.
pub const EXIT_INPUT_PARSE: u8 = 62;

/// Request exceeds `max_entries`.
pub const EXIT_OVERSIZE: u8 = 63;

/// `lookup` only: at least one catalog batch failed.
/// Reconcile never uses this; unanswered barcodes are just unmatched there.
pub const EXIT_PARTIAL_COVERAGE: u8 = 64;

/// Cannot write the `--output` file.
pub const EXIT_OUTPUT_WRITE: u8 = 65;
