use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use harness_core::MzVersion;

use crate::action::{Phase, Testdrive};

/// Applies check scripts against the system under test.
pub trait Executor {
    /// Version the scenario starts from, before any upgrade step.
    fn base_version(&self) -> &MzVersion;

    /// Called before the scripts of upgrade step `step` (1-based) are applied.
    fn upgrade(&mut self, _step: usize) -> Result<()> {
        Ok(())
    }

    fn apply(&mut self, check: &str, phase: Phase, script: &Testdrive) -> Result<()>;
}

/// Writes every applied script to `<dir>/<check>/<NN>-<phase>.td`.
///
/// The sequence number restarts per check, so listing a check's directory
/// in lexical order gives the order the scripts must be fed to testdrive.
pub struct ScriptDirExecutor {
    dir: PathBuf,
    base_version: MzVersion,
    sequence: HashMap<String, usize>,
}

impl ScriptDirExecutor {
    pub fn new(dir: impl Into<PathBuf>, base_version: MzVersion) -> Self {
        Self {
            dir: dir.into(),
            base_version,
            sequence: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Executor for ScriptDirExecutor {
    fn base_version(&self) -> &MzVersion {
        &self.base_version
    }

    fn upgrade(&mut self, step: usize) -> Result<()> {
        log::info!("Upgrade step {step} from base {}", self.base_version);
        Ok(())
    }

    fn apply(&mut self, check: &str, phase: Phase, script: &Testdrive) -> Result<()> {
        let check_dir = self.dir.join(check);
        fs::create_dir_all(&check_dir)?;

        let seq = self.sequence.entry(check.to_string()).or_insert(0);
        let path = check_dir.join(format!("{:02}-{}.td", *seq, phase));
        *seq += 1;

        log::debug!("Writing {} script for {check} to {}", phase, path.display());
        fs::write(&path, script.input())?;
        Ok(())
    }
}
