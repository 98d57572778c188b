//! Todolist command-line client.
//!
//! Probes the session, logs in with configured credentials when needed,
//! loads every todolist with its tasks and prints the resulting state tree
//! as JSON.

use anyhow::Context;
use std::time::Duration;
use todolist_api::TodolistClient;
use todolist_client::{
    create_store, AppAction, AuthAction, ClientConfig, TasksAction, TodolistEnvironment,
    TodolistsAction,
};
use todolist_runtime::EffectHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ClientConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(api_url = %config.api.url, "Starting todolist client");

    let client = TodolistClient::with_url(&config.api.url, &config.api.key)
        .context("Failed to build HTTP client")?;
    let store = create_store(TodolistEnvironment::new(client));

    store.send(AppAction::Initialize.into()).await?.wait().await;

    let mut logged_in = store.state(|s| s.auth.is_logged_in).await;
    if !logged_in {
        if let Some(credentials) = &config.credentials {
            info!(email = %credentials.email, "No active session, logging in");
            store
                .send(AuthAction::Login(credentials.login_params()).into())
                .await?
                .wait()
                .await;
            logged_in = store.state(|s| s.auth.is_logged_in).await;
        }
    }

    if logged_in {
        store.send(TodolistsAction::FetchAll.into()).await?.wait().await;

        let ids = store.state(|s| s.todolists.ids()).await;
        info!(count = ids.len(), "Loading tasks");

        let mut handles: Vec<EffectHandle> = Vec::with_capacity(ids.len());
        for todolist_id in ids {
            handles.push(store.send(TasksAction::FetchForList { todolist_id }.into()).await?);
        }
        for handle in &mut handles {
            handle.wait().await;
        }
    } else {
        warn!("Not logged in; set TODOLIST_EMAIL and TODOLIST_PASSWORD to log in");
    }

    if let Some(error) = store.state(|s| s.app.error.clone()).await {
        warn!(%error, "Last request failed");
    }

    let snapshot = store.state(serde_json::to_string_pretty).await?;
    println!("{snapshot}");

    store.shutdown(SHUTDOWN_TIMEOUT).await?;
    info!("Done");

    Ok(())
}
