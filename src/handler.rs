//! Connection handler
//!
//! Drives one [`Session`] over an async byte stream: frames inbound
//! lines, feeds them to the session and writes every reply before the
//! next one. Ends on stream closure, timeout, I/O failure or shutdown.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::codec::LineCodec;
use crate::config::Timeouts;
use crate::error::AppError;
use crate::message::Reply;
use crate::session::Session;
use crate::types::SessionId;

type Transport<S> = Framed<S, LineCodec>;

/// Handle a new connection
///
/// `peer` is only used for logging. Returns `Ok(())` for every ordinary
/// ending (peer closed, read timeout, shutdown); an `Err` means the
/// connection failed and has already been dropped.
pub async fn handle_connection<S>(
    stream: S,
    peer: String,
    timeouts: Timeouts,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(SessionId::new());
    let session_id = session.id();
    info!(session = %session_id, peer = %peer, "Client connected");

    let transport = Framed::new(stream, LineCodec::new());

    match serve(&mut session, transport, timeouts, &mut shutdown).await {
        Err(e) if e.is_disconnect() => {
            debug!(session = %session_id, error = %e, "Peer went away");
            info!(session = %session_id, "Client disconnected");
            Ok(())
        }
        Err(e) => {
            warn!(session = %session_id, error = %e, "Session ended with error");
            Err(e)
        }
        Ok(()) => {
            info!(session = %session_id, "Client disconnected");
            Ok(())
        }
    }
}

/// Read-dispatch-write loop of one session
async fn serve<S>(
    session: &mut Session,
    mut transport: Transport<S>,
    timeouts: Timeouts,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let session_id = session.id();

    loop {
        let next = tokio::select! {
            _ = shutdown.recv() => {
                info!(session = %session_id, "Shutdown signalled, closing session");
                return Ok(());
            }
            next = read_line(&mut transport, timeouts) => next,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(session = %session_id, "Stream closed by peer");
                return Ok(());
            }
            Err(AppError::ReadTimeout) => {
                info!(session = %session_id, "Client idle past read timeout");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        debug!(session = %session_id, line = %line, "RECV");

        for reply in session.handle_line(&line) {
            write_reply(&mut transport, session_id, reply, timeouts).await?;
        }
    }
}

/// Wait for the next framed line, bounded by the read timeout
async fn read_line<S>(
    transport: &mut Transport<S>,
    timeouts: Timeouts,
) -> Result<Option<String>, AppError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let next = match timeouts.read {
        Some(limit) => tokio::time::timeout(limit, transport.next())
            .await
            .map_err(|_| AppError::ReadTimeout)?,
        None => transport.next().await,
    };
    Ok(next.transpose()?)
}

/// Write one reply and flush it, bounded by the write timeout
async fn write_reply<S>(
    transport: &mut Transport<S>,
    session_id: SessionId,
    reply: Reply,
    timeouts: Timeouts,
) -> Result<(), AppError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    debug!(session = %session_id, line = %reply, "SEND");
    match timeouts.write {
        Some(limit) => tokio::time::timeout(limit, transport.send(reply))
            .await
            .map_err(|_| AppError::WriteTimeout)??,
        None => transport.send(reply).await?,
    }
    Ok(())
}
