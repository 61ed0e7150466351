use super::directive::Session;
use super::handshake::handshake;
use crate::conn::Outbound;
use crate::util::transcript::Transcript;
use crate::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::io::{BufReader, Lines};
use tokio::sync::mpsc;

/// Drive one accepted connection from handshake to teardown
pub async fn handle_connection<S>(state: Arc<AppState>, socket: S, addr: SocketAddr)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = io::split(socket);

    // create a mpsc channel for passing lines to the connection
    let capacity = state.config.client_channel_capacity;
    let (tx, rx) = mpsc::channel(capacity);

    // this task owns the write half and drains the outgoing queue
    let mut send_task = tokio::spawn(write_loop(write_half, rx));

    let mut lines = BufReader::new(read_half).lines();

    let client = match handshake(&state, &mut lines, &tx).await {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!("handshake with {} aborted: {}", addr, e);
            // let the writer flush any pending notice before the socket drops
            drop(tx);
            let _ = send_task.await;
            return;
        }
    };

    let id = client.id();
    let name = client.name().to_owned();
    let role = client.role();

    state.hub.register(client).await;
    state.hub.broadcast(&format!("{} joined", name)).await;
    tracing::debug!("{} joined from {}", name, addr);

    let transcript = match Transcript::open(&state.config.storage_directory, &name).await {
        Ok(transcript) => Some(transcript),
        Err(e) => {
            tracing::error!("failed to open transcript for {}: {}", name, e);
            None
        }
    };

    let session = Session {
        state: state.clone(),
        id,
        name: name.clone(),
        role,
        tx,
    };
    let mut recv_task = tokio::spawn(read_loop(session, lines, transcript));

    // a kick ends the send task; a read error or `/exit` ends the recv task
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    // teardown, reached exactly once whichever way the session ended
    state.hub.unregister(id).await;
    state.hub.broadcast(&format!("{} left the chat", name)).await;
    tracing::debug!("{} disconnected ({})", name, addr);
}

async fn read_loop<R>(session: Session, mut lines: Lines<R>, mut transcript: Option<Transcript>)
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            // end of stream and decode errors both mean the peer is gone
            Ok(None) | Err(_) => return,
        };

        if !session.dispatch(line.trim(), &mut transcript).await {
            return;
        }
    }
}

async fn write_loop<W>(mut writer: W, mut rx: mpsc::Receiver<Outbound>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = rx.recv().await {
        match frame {
            Outbound::Line(line) => {
                let data = format!("{}\n", line);
                if writer.write_all(data.as_bytes()).await.is_err() {
                    break;
                }
                if writer.flush().await.is_err() {
                    break;
                }
            }
            Outbound::Close => break,
        }
    }
}
