//! Purpose: Internal JSON parsing boundary shared by decode callsites.
//! Exports: `parse` module with the decode helper used by the dispatch pipeline.
//! Role: Single seam for parser usage so callsites avoid ad hoc decode logic.
//! Invariants: Runtime JSON parsing goes through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
