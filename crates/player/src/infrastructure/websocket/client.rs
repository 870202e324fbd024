//! Desktop WebSocket transport using tokio-tungstenite

use std::sync::{Arc, Mutex, PoisonError};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::error::TransportError;
use crate::ports::outbound::{ConnectorPort, InboundEvent, InboundHook, ReadyState, TransportPort};

/// Opens [`WsTransport`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl ConnectorPort for WsConnector {
    fn open(
        &self,
        address: &str,
        hook: InboundHook,
    ) -> Result<Arc<dyn TransportPort>, TransportError> {
        let transport: Arc<dyn TransportPort> = WsTransport::open(address, hook)?;
        Ok(transport)
    }
}

/// One WebSocket connection to the game server
pub struct WsTransport {
    url: Url,
    ready: Arc<watch::Sender<ReadyState>>,
    tx: mpsc::UnboundedSender<Message>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WsTransport {
    /// Validate `address` and spawn the connection task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(address: &str, hook: InboundHook) -> Result<Arc<Self>, TransportError> {
        let url = parse_ws_url(address)?;
        let (ready, _) = watch::channel(ReadyState::Connecting);
        let ready = Arc::new(ready);
        let (tx, rx) = mpsc::unbounded_channel::<Message>();

        let task = tokio::spawn(run_connection(
            url.clone(),
            Arc::clone(&ready),
            rx,
            hook,
        ));

        Ok(Arc::new(Self {
            url,
            ready,
            tx,
            task: Mutex::new(Some(task)),
        }))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl TransportPort for WsTransport {
    fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    fn watch_ready(&self) -> watch::Receiver<ReadyState> {
        self.ready.subscribe()
    }

    fn transmit(&self, frame: String) -> Result<(), TransportError> {
        if self.ready_state() != ReadyState::Open {
            return Err(TransportError::NotOpen);
        }
        self.tx
            .send(Message::Text(frame))
            .map_err(|_| TransportError::Closed)
    }

    fn close(&self) {
        let previous = self.ready.send_replace(ReadyState::Closed);
        if previous == ReadyState::Closed {
            return;
        }
        tracing::info!(url = %self.url, "Closing connection");
        // The connection task may already be gone; nothing left to close then.
        let _ = self.tx.send(Message::Close(None));
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        let task = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if !task.is_finished() && self.ready_state() == ReadyState::Connecting {
                // Nobody can reach a transport that never opened; stop dialing.
                task.abort();
            }
        }
    }
}

/// Accept only ws:// and wss:// addresses
pub fn parse_ws_url(address: &str) -> Result<Url, TransportError> {
    let url = Url::parse(address).map_err(|e| TransportError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(TransportError::InvalidAddress {
            address: address.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Connection task: connect, then pump frames both ways until either side ends.
async fn run_connection(
    url: Url,
    ready: Arc<watch::Sender<ReadyState>>,
    mut rx: mpsc::UnboundedReceiver<Message>,
    hook: InboundHook,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            tracing::error!(url = %url, "Failed to connect: {}", e);
            ready.send_replace(ReadyState::Closed);
            hook(InboundEvent::Closed);
            return;
        }
    };

    let (mut write, mut read) = stream.split();

    // close() may have been called while the handshake was in flight
    let opened = ready.send_if_modified(|state| {
        if *state == ReadyState::Connecting {
            *state = ReadyState::Open;
            true
        } else {
            false
        }
    });
    if !opened {
        tracing::debug!(url = %url, "Connection closed before it opened");
        let _ = write.send(Message::Close(None)).await;
        hook(InboundEvent::Closed);
        return;
    }
    tracing::info!(url = %url, "Connected to game server");

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => hook(InboundEvent::Frame(text)),
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            },
            outbound = rx.recv() => match outbound {
                Some(message) => {
                    let closing = matches!(message, Message::Close(_));
                    if let Err(e) = write.send(message).await {
                        tracing::error!("Failed to send message: {}", e);
                        break;
                    }
                    if closing {
                        break;
                    }
                }
                // Every handle to this transport is gone
                None => break,
            },
        }
    }

    ready.send_replace(ReadyState::Closed);
    hook(InboundEvent::Closed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_websocket_schemes_only() {
        assert!(parse_ws_url("ws://mafen.club:8000").is_ok());
        assert!(parse_ws_url("wss://example.com/socket").is_ok());

        let err = parse_ws_url("http://example.com").unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
        assert!(parse_ws_url("not a url").is_err());
    }

    #[tokio::test]
    async fn failed_connect_reports_closed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let hook: InboundHook = Arc::new(move |event| {
            let _ = tx.send(event);
        });

        // Port 9 (discard) on loopback is essentially never listening
        let transport = WsTransport::open("ws://127.0.0.1:9", hook).unwrap();
        assert_eq!(rx.recv().await, Some(InboundEvent::Closed));
        assert_eq!(transport.ready_state(), ReadyState::Closed);
        assert!(matches!(
            transport.transmit("{}".into()),
            Err(TransportError::NotOpen)
        ));
    }
}
