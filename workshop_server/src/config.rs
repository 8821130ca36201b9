use std::net::SocketAddr;

use clap::Parser;

/// HTTP API for the workshop store.
#[derive(Parser, Debug, Clone)]
#[command(name = "workshop-server", version, about)]
pub struct Config {
    /// SeaORM connection URL of the SQLite database.
    #[arg(
        long,
        env = "WORKSHOP_DATABASE_URL",
        default_value = "sqlite:./mydb.sqlite?mode=rwc"
    )]
    pub database_url: String,

    /// Address to listen on.
    #[arg(long, env = "WORKSHOP_LISTEN", default_value = "127.0.0.1:3002")]
    pub listen: SocketAddr,

    /// Upper bound for the connection pool.
    #[arg(long, env = "WORKSHOP_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,

    /// Do not insert the product catalogue into an empty store.
    #[arg(long)]
    pub no_seed: bool,
}
