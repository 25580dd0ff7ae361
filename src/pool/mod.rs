//! Pool lifecycle management.
//!
//! This module owns everything below the client surface:
//! - The rotating set of connection pools and round-robin selection
//! - Background health sweeps over every pool slot
//! - Credential rotation, swapping one slot at a time to a fresh pool

pub mod health;
pub mod rotation;
pub mod set;

use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tracing::debug;

use crate::config::{masked_dsn, ClientOptions};
use crate::error::{PoolError, PoolResult};

pub use health::PoolHealth;
pub use set::PoolMetrics;

/// Open one pool against `dsn`, sized and timed per `options`.
///
/// The pool itself is created lazily; unless `lazy_connect` is set, a
/// bounded acquire-and-ping verifies the server is reachable before the
/// pool is handed out. A pool that fails verification is closed, never
/// returned.
pub(crate) async fn open_pool(options: &ClientOptions, dsn: &str) -> PoolResult<MySqlPool> {
    let connect_options = MySqlConnectOptions::from_str(dsn)
        .map_err(|e| {
            PoolError::connection(
                format!("invalid connection string {}", masked_dsn(dsn)),
                Some(e),
            )
        })?
        .charset("utf8mb4");

    let pool = MySqlPoolOptions::new()
        .min_connections(options.min_connections)
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .idle_timeout(Some(options.idle_timeout))
        .max_lifetime(Some(options.max_lifetime))
        .test_before_acquire(options.test_before_acquire)
        .connect_lazy_with(connect_options);

    if !options.lazy_connect {
        if let Err(e) = health::probe(&pool, options.connect_timeout).await {
            pool.close().await;
            return Err(PoolError::connection(
                format!("failed to reach {}", masked_dsn(dsn)),
                Some(e),
            ));
        }
        debug!(server = %masked_dsn(dsn), "pool verified");
    }

    Ok(pool)
}
