//! This library crate contains all the necessities to run a busbridge instance.
//!
//! Submodules have been introduced to split responsibilities. They form a chain of
//! dependencies from the low-level [`library`], over the [`domain`] specific command
//! definitions, up to the high-level, runnable [`modules`](module).

#![deny(missing_docs)]

pub mod constants;
pub mod domain;
pub mod library;
pub mod module;
