pub mod cluster_unification;
pub mod schemas;

use crate::check::Check;

/// Every registered check. New checks must be added here to be picked up by
/// the `checks` binary.
pub fn all_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(schemas::CheckSchemas),
        Box::new(schemas::RenameSchemas),
        Box::new(cluster_unification::UnifiedCluster),
    ]
}

/// Case-insensitive lookup by [`Check::name`].
pub fn find_check(name: &str) -> Option<Box<dyn Check>> {
    all_checks()
        .into_iter()
        .find(|check| check.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::{all_checks, find_check};
    use crate::scenario::UPGRADE_STEPS;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<String> = all_checks()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn every_check_covers_each_upgrade_step() {
        for check in all_checks() {
            let steps = check.manipulate();
            assert_eq!(steps.len(), UPGRADE_STEPS, "{}", check.name());
            assert!(steps.iter().all(|s| !s.is_empty()), "{}", check.name());
            assert!(!check.validate().is_empty(), "{}", check.name());
        }
    }

    #[test]
    fn scripts_start_in_column_zero() {
        for check in all_checks() {
            let mut scripts = vec![check.initialize(), check.validate()];
            scripts.extend(check.manipulate());
            for script in scripts.iter().filter(|s| !s.is_empty()) {
                let input = script.input();
                assert!(!input.starts_with('\n'), "{}: {input:?}", check.name());
                assert!(input.ends_with('\n'), "{}: {input:?}", check.name());
                for line in input.lines().filter(|l| !l.trim().is_empty()) {
                    // Continuation lines of a multi-line statement stay indented.
                    let first = line.trim_start().chars().next();
                    if line.starts_with(' ') {
                        assert!(
                            !matches!(first, Some('>' | '!' | '$')),
                            "{}: {line:?}",
                            check.name()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let found = find_check("renameschemas").map(|c| c.name().to_string());
        assert_eq!(found.as_deref(), Some("RenameSchemas"));
        assert!(find_check("NoSuchCheck").is_none());
    }
}
