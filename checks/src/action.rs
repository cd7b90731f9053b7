use std::fmt;

/// A block of testdrive input.
///
/// The text is kept as given; checks write their scripts with `indoc!` so
/// every line starts in column zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Testdrive {
    input: String,
}

impl Testdrive {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }
}

impl fmt::Display for Testdrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

/// Where in a check's lifecycle a script is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialize,
    /// 1-based upgrade step.
    Manipulate(usize),
    Validate,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initialize => f.write_str("initialize"),
            Phase::Manipulate(step) => write!(f, "manipulate-{step}"),
            Phase::Validate => f.write_str("validate"),
        }
    }
}
