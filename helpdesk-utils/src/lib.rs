/// Pure parser helpers (forwarded identity, flag values).
pub mod parse;
/// Timeout and single-retry wrapper for calls to external collaborators.
pub mod retry;
/// Shared time helpers.
pub mod time;
