use indoc::indoc;

use crate::action::Testdrive;
use crate::check::Check;

/// Sources and compute objects share a cluster, regardless of which kind of
/// object was placed into the cluster first.
pub struct UnifiedCluster;

impl Check for UnifiedCluster {
    fn initialize(&self) -> Testdrive {
        Testdrive::new(indoc! {"
            >[version>=13800] CREATE CLUSTER shared_cluster_compute_first SIZE '1', REPLICATION FACTOR 2;
            >[version<13800] CREATE CLUSTER shared_cluster_compute_first SIZE '1', REPLICATION FACTOR 1;
            >[version>=13800] CREATE CLUSTER shared_cluster_storage_first SIZE '1', REPLICATION FACTOR 2;
            >[version<13800] CREATE CLUSTER shared_cluster_storage_first SIZE '1', REPLICATION FACTOR 1;
        "})
    }

    fn manipulate(&self) -> Vec<Testdrive> {
        vec![
            // One cluster gets a source first, the other a materialized view.
            Testdrive::new(indoc! {"
                > CREATE SOURCE shared_cluster_storage_first_source
                  IN CLUSTER shared_cluster_storage_first
                  FROM LOAD GENERATOR COUNTER

                > CREATE MATERIALIZED VIEW shared_cluster_compute_first_mv
                  IN CLUSTER shared_cluster_compute_first
                  AS SELECT COUNT(*) AS cnt FROM shared_cluster_storage_first_source

                > CREATE DEFAULT INDEX
                  IN CLUSTER shared_cluster_compute_first
                  ON shared_cluster_compute_first_mv
            "}),
            // Then the opposite kind lands in the now non-empty cluster.
            Testdrive::new(indoc! {"
                > CREATE SOURCE shared_cluster_compute_first_source
                  IN CLUSTER shared_cluster_compute_first
                  FROM LOAD GENERATOR COUNTER

                > CREATE MATERIALIZED VIEW shared_cluster_storage_first_mv
                  IN CLUSTER shared_cluster_storage_first
                  AS SELECT COUNT(*) AS cnt FROM shared_cluster_compute_first_source

                > CREATE DEFAULT INDEX
                  IN CLUSTER shared_cluster_storage_first
                  ON shared_cluster_storage_first_mv
            "}),
        ]
    }

    fn validate(&self) -> Testdrive {
        Testdrive::new(indoc! {"
            > SELECT COUNT(*) > 0 FROM shared_cluster_storage_first_source;
            true

            > SELECT cnt > 0 FROM shared_cluster_storage_first_mv;
            true

            > SELECT COUNT(*) > 0 FROM shared_cluster_compute_first_source;
            true

            > SELECT cnt > 0 FROM shared_cluster_compute_first_mv;
            true

            > SET cluster = shared_cluster_compute_first;
            > SELECT COUNT(*) > 0 FROM mz_tables;
            true

            > SET cluster = shared_cluster_storage_first;
            > SELECT COUNT(*) > 0 FROM mz_tables;
            true

            > SET cluster = default

            ! DROP CLUSTER shared_cluster_compute_first;
            contains: cannot drop cluster \"shared_cluster_compute_first\" because other objects depend on it

            ! DROP CLUSTER shared_cluster_storage_first;
            contains: cannot drop cluster \"shared_cluster_storage_first\" because other objects depend on it
        "})
    }
}
