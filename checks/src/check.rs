use crate::action::Testdrive;
use crate::executor::Executor;

/// A named upgrade scenario.
///
/// The phases are invoked by [`crate::scenario::run_scenario`] in a fixed
/// order: [`initialize`](Check::initialize) once, each element of
/// [`manipulate`](Check::manipulate) against a successively upgraded version,
/// then [`validate`](Check::validate) once.
pub trait Check {
    /// Defaults to the implementing type's name, e.g. `RenameSchemas`.
    fn name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// When this returns `false` the check is skipped entirely.
    fn can_run(&self, _executor: &dyn Executor) -> bool {
        true
    }

    fn initialize(&self) -> Testdrive {
        Testdrive::empty()
    }

    fn manipulate(&self) -> Vec<Testdrive>;

    fn validate(&self) -> Testdrive;
}

fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use super::{short_type_name, Check};
    use crate::action::Testdrive;

    struct NoInit;

    impl Check for NoInit {
        fn manipulate(&self) -> Vec<Testdrive> {
            vec![Testdrive::new("> SELECT 1;\n1")]
        }

        fn validate(&self) -> Testdrive {
            Testdrive::new("> SELECT 2;\n2")
        }
    }

    #[test]
    fn name_is_derived_from_type() {
        assert_eq!(NoInit.name(), "NoInit");
        let boxed: Box<dyn Check> = Box::new(NoInit);
        assert_eq!(boxed.name(), "NoInit");
    }

    #[test]
    fn initialize_defaults_to_empty() {
        assert!(NoInit.initialize().is_empty());
    }

    #[test]
    fn strips_module_path() {
        assert_eq!(short_type_name("checks::all_checks::schemas::CheckSchemas"), "CheckSchemas");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
