use clap::Parser;
use staticsite::config::{normalize_prefix, AppState, Config, SiteConfig};
use staticsite::{logger, server};
use std::sync::Arc;

/// Serves files from a list of directories, never directory listings.
#[derive(Parser, Debug)]
#[command(name = "staticsite", version, about)]
struct Cli {
    /// Directory to serve. Repeat with a matching --prefix per directory.
    #[arg(short = 'd', long = "dir")]
    dirs: Vec<String>,

    /// Prefix under which to serve files from the matching directory.
    #[arg(short = 'p', long = "prefix")]
    prefixes: Vec<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Config file path, extension optional
    #[arg(long, default_value = "staticsite")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = Config::load_from(&cli.config)?;

    // Misconfiguration is the one fatal condition; everything at request
    // time degrades to an error response instead.
    if cli.dirs.len() != cli.prefixes.len() {
        return Err("you need to specify a prefix for each directory".into());
    }
    if !cli.dirs.is_empty() {
        cfg.sites = cli
            .dirs
            .iter()
            .zip(&cli.prefixes)
            .map(|(dir, prefix)| SiteConfig {
                dir: dir.clone(),
                prefix: prefix.clone(),
            })
            .collect();
    }
    if let Some(port) = cli.port {
        cfg.server.port = port;
    }
    if cfg.sites.is_empty() {
        return Err(
            "no directories to serve: pass --dir/--prefix pairs or configure [[sites]]".into(),
        );
    }
    for site in &mut cfg.sites {
        site.prefix = normalize_prefix(&site.prefix);
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(serve(cfg))
}

async fn serve(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;
    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(AppState::new(&cfg));
    server::run(listener, state).await?;
    Ok(())
}
