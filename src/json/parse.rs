//! Purpose: Provide the internal runtime JSON decode entrypoint.
//! Exports: `from_slice`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Decoding is strict; no lenient or partial parses.
//! Notes: Error mapping is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;

pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}
