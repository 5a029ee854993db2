use std::{env, net::SocketAddr, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_rs::{AppState, GoogleIdTokenVerifier, IdTokenVerifier, build_router, graceful_shutdown};

/// The REST API server for fintrack_rs.
///
/// The secret for signing bearer tokens is read from the environment variable
/// `SECRET`. Google sign-in is enabled by setting `GOOGLE_CLIENT_ID`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the timezone used for "today", e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// How many hours a bearer token is valid for.
    #[arg(long, default_value_t = 24)]
    token_hours: i64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let id_token_verifier = match env::var("GOOGLE_CLIENT_ID") {
        Ok(client_id) if !client_id.trim().is_empty() => {
            Some(Arc::new(GoogleIdTokenVerifier::new(client_id.trim())) as Arc<dyn IdTokenVerifier>)
        }
        _ => {
            tracing::warn!("GOOGLE_CLIENT_ID is not set, Google sign-in is disabled");
            None
        }
    };

    let conn = Connection::open(&args.db_path).expect("Could not open the database file");
    let state = AppState::new(conn, &secret, &args.timezone, id_token_verifier)
        .expect("Could not initialize the application state")
        .with_token_duration(Duration::hours(args.token_hours));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
