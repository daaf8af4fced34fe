//! Embedded PostgreSQL databases for repository tests.
//!
//! One cluster is shared per test binary. A template database is migrated
//! once with the crate's embedded migrations, keyed by a hash of the
//! `migrations/` directory, and every test gets its own clone of it.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use crm::domain::ports::AccountRepository;
use crm::domain::{NewUser, OrganisationId, PasswordHash, User};
use crm::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig, run_migrations};
use crm::test_support::fixtures::details;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

use super::handle_cluster_setup_failure;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "crm_template";
const CLUSTER_RETRIES: usize = 5;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Hash stored for users seeded directly through the repositories.
pub const SEEDED_PASSWORD_HASH: &str = "$argon2id$seeded";

/// A migrated database, a pool over it and the runtime that drives both.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    pub url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Sign up an organisor directly through the account repository.
    pub fn seed_organisor(&self, username: &str) -> (User, OrganisationId) {
        let accounts = DieselAccountRepository::new(self.pool.clone());
        let user = NewUser::organisor(details(username), PasswordHash::new(SEEDED_PASSWORD_HASH));
        self.runtime
            .block_on(accounts.create_organisor(&user))
            .unwrap_or_else(|err| panic!("seed organisor {username}: {err}"))
    }
}

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// The per-process cluster, retried while a sibling binary is still starting it.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) if attempt < CLUSTER_RETRIES => {
                eprintln!("pg-embed: attempt {attempt}/{CLUSTER_RETRIES} failed: {err:?}");
                std::thread::sleep(RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("{err:?}")),
        }
    }
}

/// Creates the template on first use and applies the embedded migrations to it.
fn ensure_template_database(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        let applied = runtime
            .block_on(run_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
        if applied == 0 {
            return Err("template migrated with no migrations applied".to_owned());
        }
    }
    Ok(template_name)
}

/// An empty database with no migrations applied.
pub fn empty_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let name = format!("empty_{}", Uuid::new_v4().simple());
    cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create empty database: {err:?}"))
}

fn setup_database() -> Result<TestDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let template_name = ensure_template_database(cluster, &runtime)?;
    let name = format!("test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database_from_template(name.as_str(), template_name.as_str())
        .map_err(|err| format!("create database from template: {err:?}"))?;
    let url = database.url().to_owned();

    let config = PoolConfig::new(url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        runtime,
        pool,
        url,
        _database: database,
    })
}

/// A freshly cloned database, or `None` when the cluster is unavailable and
/// skipping is allowed.
pub fn test_database() -> Option<TestDatabase> {
    match setup_database() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
