use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::StaticFiles;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let files = StaticFiles::new(
        &cfg.static_files.document_root,
        cfg.static_files.server_name.clone(),
    )
    .with_context(|| {
        format!(
            "invalid document root {}",
            cfg.static_files.document_root.display()
        )
    })?;
    let files = Arc::new(files);
    let limits = cfg.limits();

    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!(
        "Serving {} on {}",
        files.document_root().display(),
        cfg.server.listen_addr
    );

    loop {
        let (socket, peer) = listener.accept().await?;
        tracing::debug!("Accepted connection from {}", peer);

        let files = Arc::clone(&files);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, files, limits).with_peer(peer);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
