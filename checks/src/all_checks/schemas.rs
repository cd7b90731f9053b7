use harness_core::MzVersion;
use indoc::indoc;

use crate::action::Testdrive;
use crate::check::Check;
use crate::executor::Executor;

/// Schemas created before an upgrade survive it; schemas dropped in between
/// stay dropped.
pub struct CheckSchemas;

impl Check for CheckSchemas {
    fn manipulate(&self) -> Vec<Testdrive> {
        [
            indoc! {"
            > CREATE SCHEMA to_be_created;

            > CREATE SCHEMA to_be_dropped;
            > CREATE TABLE to_be_dropped.t1 (f1 INTEGER);
            "},
            indoc! {"
            > DROP SCHEMA to_be_dropped CASCADE;
            "},
        ]
        .into_iter()
        .map(Testdrive::new)
        .collect()
    }

    fn validate(&self) -> Testdrive {
        Testdrive::new(indoc! {"
            > SHOW SCHEMAS LIKE 'to_be_%';
            to_be_created
        "})
    }
}

/// `ALTER SCHEMA ... RENAME TO` issued before and during an upgrade.
pub struct RenameSchemas;

const RENAME_SCHEMA_SUPPORTED: MzVersion = MzVersion::new(0, 74, 0);

impl Check for RenameSchemas {
    fn can_run(&self, executor: &dyn Executor) -> bool {
        *executor.base_version() >= RENAME_SCHEMA_SUPPORTED
    }

    fn initialize(&self) -> Testdrive {
        Testdrive::new(indoc! {"
            > CREATE SCHEMA rename_me1;
            > CREATE SCHEMA rename_me2;
            > CREATE SCHEMA rename_me3;

            > CREATE TABLE rename_me1.t1 (f1 INTEGER);
            > CREATE TABLE rename_me2.t2 (f1 INTEGER);
            > CREATE TABLE rename_me3.t3 (f1 INTEGER);

            > INSERT INTO rename_me1.t1 VALUES (1);
            > INSERT INTO rename_me2.t2 VALUES (2);
            > INSERT INTO rename_me3.t3 VALUES (3);

            > ALTER SCHEMA rename_me1 RENAME TO renamed1;
        "})
    }

    fn manipulate(&self) -> Vec<Testdrive> {
        [
            indoc! {"
            > ALTER SCHEMA rename_me2 RENAME TO renamed2;
            "},
            indoc! {"
            > ALTER SCHEMA rename_me3 RENAME TO renamed3;
            "},
        ]
        .into_iter()
        .map(Testdrive::new)
        .collect()
    }

    fn validate(&self) -> Testdrive {
        Testdrive::new(indoc! {"
            > SHOW SCHEMAS LIKE 'rename%';
            renamed1
            renamed2
            renamed3

            > SET SCHEMA = renamed1;

            > SELECT * FROM t1;
            1

            > SET SCHEMA = renamed2;

            > SELECT * FROM t2;
            2

            > SET SCHEMA = renamed3;

            > SELECT * FROM t3;
            3
        "})
    }
}
