//! Upgrade checks
//!
//! A check is a named scenario that sets up some catalog or data state,
//! manipulates it once per step of a rolling upgrade and finally validates
//! the result. Each phase is a [`action::Testdrive`] script; interpreting the
//! scripts is left to the external testdrive tool.
//!
//! - [`check::Check`]: the trait every check implements
//! - [`executor::Executor`]: where scripts are applied
//! - [`scenario::run_scenario`]: drives the phases of many checks in order
//! - [`all_checks`]: the registry of concrete checks

pub mod action;
pub mod all_checks;
pub mod check;
pub mod executor;
pub mod scenario;
