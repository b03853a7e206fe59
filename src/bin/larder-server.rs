// ABOUTME: Larder server binary - configuration, logging, store bootstrap and serving
// ABOUTME: Seeds the demo consumption log on first run against an empty database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! # Larder API Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use larder_server::{
    config::ServerConfig,
    database::Database,
    llm::OpenAiCompatibleProvider,
    logging,
    resources::ServerResources,
    routes,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "larder-server")]
#[command(about = "Larder - Smart kitchen inventory API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;
    info!("Starting Larder API server");
    info!("{}", config.summary());

    // The default sqlite url lives under data/, like the frontends expect.
    std::fs::create_dir_all("data")?;

    let database = Arc::new(Database::new(&config.database_url).await?);
    if database.seed_sample_data().await? {
        info!("database was empty; installed the sample consumption log");
    }

    let provider = Arc::new(OpenAiCompatibleProvider::new(config.llm.clone())?);
    info!(model = %config.llm.model, "LLM provider initialized");

    let addr = format!("0.0.0.0:{}", config.http_port);
    let resources = Arc::new(ServerResources::new(config, database, provider));
    let router = routes::router(resources);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
