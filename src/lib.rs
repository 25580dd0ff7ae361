//! Rotating MySQL connection pools.
//!
//! This library keeps a fixed-size set of `sqlx` MySQL pools behind one
//! cloneable client handle:
//! - Round-robin selection across independent pools
//! - Zero-downtime credential rotation, one pool per tick
//! - Background liveness sweeps with a queryable per-pool report
//! - Retry with capped exponential backoff for transient errors
//!
//! ```no_run
//! use mysql_rotating_pool::{BoxError, ClientOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BoxError> {
//!     let client = ClientOptions::new()
//!         .credential_source(|| Ok::<_, BoxError>(std::env::var("DATABASE_URL")?))
//!         .pool_count(2)
//!         .rotation_interval(Duration::from_secs(3600))
//!         .connect()
//!         .await?;
//!
//!     let pool = client.pool().await?;
//!     sqlx::query("SELECT 1").execute(&pool).await?;
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pool;
pub mod retry;

pub use client::Client;
pub use config::{ClientOptions, CredentialSource};
pub use error::{BoxError, PoolError, PoolResult};
pub use pool::{PoolHealth, PoolMetrics};
pub use retry::{RetryPolicy, MAX_BACKOFF};
