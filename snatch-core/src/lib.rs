//! Domain layer for the snatch workspace.
//!
//! Everything here is browser-agnostic: turning raw target locators into
//! URLs, deriving collision-safe output names, the retry policy, and the
//! per-target acquisition loop expressed over the [`acquire::Acquire`] seam.
//! The browser-backed implementation of that seam lives in the binary; tests
//! drive the loop with scripted fixtures instead.

pub mod acquire;
pub mod naming;
pub mod retry;
pub mod targets;
