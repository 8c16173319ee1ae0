//! Example consumer: a separate Rust project that uses transact-client as a
//! dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`

use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use transact_client::{Client, HttpTransport, ListQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("transact_client=debug")),
        )
        .init();

    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000/api".into());
    let transport = match std::env::var("API_KEY") {
        Ok(key) => Arc::new(HttpTransport::with_api_key(key)),
        Err(_) => Arc::new(HttpTransport::new()),
    };

    let mut client = Client::with_transport(base_url, transport);
    let books = client.add_general_module("books", None)?;

    for (action, url) in client.actions() {
        tracing::info!(action = %action, url = %url, "registered action");
    }

    // A one-shot call opens and settles its own backend session.
    let listing = books
        .list_ids(
            HashMap::new(),
            &ListQuery {
                page_length: 10,
                ..Default::default()
            },
            None,
        )
        .await?;
    tracing::info!(
        success = listing.success,
        total = listing.info.total_results,
        "listed book ids"
    );

    // Batching: several calls on one explicit session, settled by the caller.
    let session = client.sessions().acquire().await?;
    let created = books
        .create(
            HashMap::from([("title".to_string(), json!("The Dispossessed"))]),
            Some(&session),
        )
        .await?;
    if created.success {
        client.sessions().commit(&session).await?;
        tracing::info!(result = %created.result, "record created and committed");
    } else {
        client.sessions().rollback(&session, true).await?;
        tracing::warn!(
            message = created.info.message.as_deref().unwrap_or("unknown"),
            "create rejected; session rolled back"
        );
    }

    Ok(())
}
