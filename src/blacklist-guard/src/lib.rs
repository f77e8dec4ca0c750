//! Blacklist transaction guard for Zodiac-style avatars, on Arbitrum Stylus.
//!
//! The guard sits between a multisig avatar and the outside world: the
//! avatar consults it before every transaction it is about to execute, and
//! the guard answers against a per-target blacklist (whole-target blocks,
//! delegatecall blocks, per-selector blocks with one exceptional sender).
//! Policy changes go through guarded setters, either directly or via a
//! request relay that routes the change back through the avatar's own
//! execution path.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod errors;
pub mod guard;
pub mod inspector;
pub mod utils;
pub mod zodiac;

pub use guard::BlacklistGuard;
