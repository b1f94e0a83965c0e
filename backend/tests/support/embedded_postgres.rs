//! Embedded PostgreSQL databases for integration tests.
//!
//! - Database creation uses `postgres` so `CREATE DATABASE` runs outside any
//!   Diesel transaction.
//! - Schema setup runs the crate's embedded migrations so test schemas never
//!   drift from production.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use stockroom::outbound::persistence::run_migrations;
use uuid::Uuid;

use super::format_postgres_error;
use super::pg_embed::test_cluster;

/// A migrated, uniquely named database. Dropping it stops the cluster.
pub struct TestDatabase {
    url: String,
    _cluster: TestCluster,
}

impl TestDatabase {
    /// Connection URL for the migrated database.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open a plain `postgres` client for assertions that bypass Diesel.
    pub fn client(&self) -> Result<Client, String> {
        Client::connect(&self.url, NoTls).map_err(|err| format_postgres_error(&err))
    }
}

/// Start a cluster, create a fresh database and apply every migration.
pub fn provision_database() -> Result<TestDatabase, String> {
    let cluster = test_cluster()?;
    let name = format!("test_{}", Uuid::new_v4().simple());

    let admin_url = cluster.connection().database_url("postgres");
    let mut admin = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    admin
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;

    let url = cluster.connection().database_url(&name);
    run_migrations(&url).map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        url,
        _cluster: cluster,
    })
}
