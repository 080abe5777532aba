use std::net::SocketAddr;

use anyhow::Result;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};

use crate::common::config::{CliArgs, load_server_config};
use crate::common::frame::read_frame;
use crate::handler::context::HandlerContext;
use crate::server::dispatch::dispatch_frame;
use crate::server::liveness_sweeper::LivenessSweeper;

pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

pub async fn server_start(cli: &CliArgs) -> Result<()> {
    init_logging();
    log::info!("Logging initialized. Coordinator starting...");
    let server_config = load_server_config(cli)?;

    let listener = TcpListener::bind(server_config.listen_addr()).await?;
    log::info!("Coordinator listening on {}", listener.local_addr()?);

    let handler_ctx = HandlerContext::with_system_clock(server_config.cluster_count, server_config.liveness());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = LivenessSweeper::new(
        handler_ctx.registry.clone(),
        handler_ctx.clock.clone(),
        handler_ctx.liveness,
    )
    .spawn(shutdown_rx.clone());

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => log::error!("Failed to listen for shutdown signal: {:?}", e),
        }
    });

    serve(listener, handler_ctx, server_config.max_frame_len, shutdown_rx).await?;
    sweeper.await?;
    log::info!("Coordinator stopped");
    Ok(())
}

/// Accept loop. Each connection gets its own task until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    handler_ctx: HandlerContext,
    max_frame_len: usize,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    while !*shutdown.borrow() {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, addr) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        log::error!("Failed to accept connection: {:?}", e);
                        continue;
                    }
                };
                log::info!("Accepted connection from {:?}", addr);
                let ctx = handler_ctx.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, ctx, max_frame_len).await {
                        log::error!("Connection error from {:?}: {:?}", addr, e);
                    }
                });
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    handler_ctx: HandlerContext,
    max_frame_len: usize,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>(); // any request → writer

    let (mut reader, mut writer) = stream.into_split();
    let writer_task = tokio::spawn(async move {
        while let Some(response_bytes) = rx.recv().await {
            log::debug!("Sending response of length: {}", response_bytes.len());
            if let Err(e) = writer.write_all(&response_bytes).await {
                log::error!("Failed to write response: {:?}", e);
                break;
            }
            if let Err(e) = writer.flush().await {
                log::error!("Failed to flush writer: {:?}", e);
            }
        }
    });

    while let Some(frame) = read_frame(&mut reader, max_frame_len).await? {
        let tx = tx.clone();
        let ctx = handler_ctx.clone();
        tokio::spawn(async move {
            match dispatch_frame(&frame, &ctx).await {
                Ok(response) => {
                    let _ = tx.send(response);
                }
                Err(e) => log::error!("Failed to encode response: {:?}", e),
            }
        });
    }
    log::info!("Client {:?} disconnected", addr);

    drop(tx);
    writer_task.await?;
    Ok(())
}
