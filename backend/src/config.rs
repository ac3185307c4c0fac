use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-backend", about = "Server-rendered TODO list")]
pub struct Config {
    /// SQLite connection string.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db?mode=rwc")]
    pub database_url: String,

    /// Address the HTTP server listens on.
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: SocketAddr,

    /// Directory served under `/static`.
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,
}
