//! Safe / Zodiac compatibility shims.
//!
//! This module keeps the guard ABI-aligned with the avatar-side contracts
//! it is called by (or calls into) while the policy logic lives elsewhere.

pub mod interfaces;
