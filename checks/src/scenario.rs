//! Runs a set of checks through one rolling upgrade.
//!
//! Every runnable check is initialized against the base version. The system is
//! then upgraded [`UPGRADE_STEPS`] times; after each upgrade the matching
//! manipulate script of every check is applied. Validation runs last.

use anyhow::{bail, Result};

use crate::action::{Phase, Testdrive};
use crate::check::Check;
use crate::executor::Executor;

/// Number of manipulate scripts every check must provide.
pub const UPGRADE_STEPS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioReport {
    pub ran: Vec<String>,
    pub skipped: Vec<String>,
    pub scripts_applied: usize,
}

/// Result of [`run_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Skipped,
    /// Number of scripts handed to the executor.
    Applied(usize),
}

/// Apply every phase of a single check back to back, without upgrading in
/// between. Empty initialize scripts are not applied.
pub fn run_check(check: &dyn Check, executor: &mut dyn Executor) -> Result<CheckOutcome> {
    if !check.can_run(&*executor) {
        return Ok(CheckOutcome::Skipped);
    }

    let mut applied = 0;
    let initialize = check.initialize();
    if !initialize.is_empty() {
        executor.apply(check.name(), Phase::Initialize, &initialize)?;
        applied += 1;
    }
    for (idx, script) in check.manipulate().iter().enumerate() {
        executor.apply(check.name(), Phase::Manipulate(idx + 1), script)?;
        applied += 1;
    }
    executor.apply(check.name(), Phase::Validate, &check.validate())?;

    Ok(CheckOutcome::Applied(applied + 1))
}

pub fn run_scenario(
    checks: &[Box<dyn Check>],
    executor: &mut dyn Executor,
) -> Result<ScenarioReport> {
    let mut report = ScenarioReport::default();
    let mut runnable: Vec<(&dyn Check, Vec<Testdrive>)> = Vec::new();

    for check in checks {
        if !check.can_run(&*executor) {
            log::info!(
                "Skipping {} at base version {}",
                check.name(),
                executor.base_version()
            );
            report.skipped.push(check.name().to_string());
            continue;
        }

        let steps = check.manipulate();
        if steps.len() != UPGRADE_STEPS {
            bail!(
                "check {} provides {} manipulate scripts, expected {UPGRADE_STEPS}",
                check.name(),
                steps.len()
            );
        }
        runnable.push((check.as_ref(), steps));
    }

    for (check, _) in &runnable {
        let script = check.initialize();
        if script.is_empty() {
            continue;
        }
        executor.apply(check.name(), Phase::Initialize, &script)?;
        report.scripts_applied += 1;
    }

    for step in 1..=UPGRADE_STEPS {
        executor.upgrade(step)?;
        for (check, steps) in &runnable {
            executor.apply(check.name(), Phase::Manipulate(step), &steps[step - 1])?;
            report.scripts_applied += 1;
        }
    }

    for (check, _) in &runnable {
        executor.apply(check.name(), Phase::Validate, &check.validate())?;
        report.scripts_applied += 1;
        report.ran.push(check.name().to_string());
    }

    Ok(report)
}
