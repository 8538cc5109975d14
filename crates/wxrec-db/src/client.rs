//! Database client and connection management

use crate::{DbError, DbResult};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::debug;

/// Read-only client over a small sqlx pool
#[derive(Clone)]
pub struct DbClient {
    pool: MySqlPool,
}

fn pool_options() -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(30))
}

impl DbClient {
    /// Connect using a `mysql://` URL
    pub async fn new(database_url: &str) -> DbResult<Self> {
        check_url(database_url)?;
        let pool = pool_options().connect(database_url).await?;

        debug!("Connected to day summary database");
        Ok(Self { pool })
    }

    /// Connect from separately configured host, user and database
    pub async fn connect(builder: DbConnectionBuilder) -> DbResult<Self> {
        let target = builder.describe();
        let pool = pool_options().connect_with(builder.build()?).await?;

        debug!("Connected to {}", target);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Cheap round trip to verify the connection before a long scan
    pub async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn check_url(url: &str) -> DbResult<()> {
    if url.starts_with("mysql://") || url.starts_with("mariadb://") {
        Ok(())
    } else {
        Err(DbError::ConfigError(format!(
            "expected a mysql:// URL, got {:?}",
            url.split("://").next().unwrap_or(url)
        )))
    }
}

/// Connection parts from the `[database]` config section
#[derive(Debug, Clone)]
pub struct DbConnectionBuilder {
    host: String,
    port: u16,
    database: String,
    username: String,
    password: Option<String>,
}

impl DbConnectionBuilder {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: database.into(),
            username: "wxrec".to_string(),
            password: None,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// `user@host:port/database`, safe to log
    pub fn describe(&self) -> String {
        format!("{}@{}:{}/{}", self.username, self.host, self.port, self.database)
    }

    pub fn build(self) -> DbResult<MySqlConnectOptions> {
        if self.database.trim().is_empty() {
            return Err(DbError::ConfigError("database name is empty".to_string()));
        }
        if self.host.trim().is_empty() {
            return Err(DbError::ConfigError("database host is empty".to_string()));
        }

        let opts = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username);

        Ok(match &self.password {
            Some(password) => opts.password(password),
            None => opts,
        })
    }
}
