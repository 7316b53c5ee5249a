//! # warden-kernel
//!
//! The hook execution contract (spec §4.6): the [`InterceptionPoint`]
//! enum, the [`Hook`] trait every enforcement hook implements, and
//! [`dispatch::run_hooks`], which runs an ordered hook list
//! sequentially, short-circuits on the first block, and contains any
//! hook panic according to that hook's declared [`HookPosture`].
//!
//! This crate does not itself know which hooks exist — building the
//! point → hook-list dispatch table is `warden-hooks`' job. This crate
//! only defines the contract and the generic runner.

pub mod dispatch;
pub mod error;
pub mod hook;
pub mod point;

pub use dispatch::run_hooks;
pub use error::KernelError;
pub use hook::{Hook, HookContext, HookPosture};
pub use point::InterceptionPoint;
