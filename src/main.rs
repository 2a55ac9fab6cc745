mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
#[cfg(test)]
mod memory;
mod recipes;
mod state;
mod tags;
#[cfg(test)]
mod test_support;

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "recipe_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = state::AppState::init().await?;
    let addr = state.config.bind_addr();
    let app = app::build_app(state);

    app::serve(app, &addr).await
}
