//! Shared types for the blacklist guard, usable both inside the Stylus
//! contract and in off-chain tooling.

#![no_std]

extern crate alloc;

pub mod exec_params;
pub mod operation;
pub mod policy;

pub use exec_params::ExecParams;
pub use operation::Operation;
pub use policy::PolicyLookup;
