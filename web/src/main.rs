use anyhow::Result;
use axum::Router;
use axum_template::engine::Engine;
use clap::Parser;
use config::EnvConfig;
use minijinja::Environment;
use state::{AppState, SharedState};
use std::{net::SocketAddr, path::Path, path::PathBuf, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info};
use tracing_subscriber::filter::EnvFilter;

mod api;
mod config;
mod error;
mod html;
mod state;
#[cfg(test)]
mod tests;

const API_PREFIX: &str = "/api/v1";
const DATA_PREFIX: &str = "/data";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, default_value = "environments.yaml")]
    pub config: PathBuf,
    #[arg(short, long, default_value = "dev")]
    pub env: String,
    #[arg(
        short,
        long,
        default_value = "web",
        help = "Directory containing the 'templates' and 'static' directories"
    )]
    pub datadir: PathBuf,
}

pub fn api_url(value: &str) -> String {
    [API_PREFIX, "/", value.trim_start_matches('/')].join("")
}

pub(crate) fn template_engine<P: AsRef<Path>>(path: P) -> Engine<Environment<'static>> {
    let mut jinja = Environment::new();
    jinja.set_loader(minijinja::path_loader(path));
    Engine::from(jinja)
}

pub(crate) fn app(state: AppState) -> Router {
    let static_dir = state.datadir.join("static");
    let survey_dir = state.survey_dir();
    debug!(?static_dir, ?survey_dir, "Serving files");
    Router::new()
        .merge(html::router())
        .nest(API_PREFIX, api::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service(DATA_PREFIX, ServeDir::new(survey_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("CENOTEWEB_LOG"))
        .init();
    let args = Cli::parse();
    debug!(?args.config, ?args.env, "loading configuration");
    let env = EnvConfig::load(&args.config, &args.env)?;
    let addr: SocketAddr = format!("{}:{}", env.listen.host, env.listen.port).parse()?;

    let shared_state = Arc::new(SharedState::new(env, args.datadir));
    let app = app(shared_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolves once `signal` fires. If the signal can't be listened for, this never resolves and the
/// server keeps running.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Unable to listen for the shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
