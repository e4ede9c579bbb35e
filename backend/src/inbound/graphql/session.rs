//! Per-connection GraphQL subscription session.
//!
//! Client frames are fed to async-graphql's protocol state machine, which
//! yields the frames to send back. Ending the session drops that state
//! machine together with every subscription stream it owns, which in turn
//! cancels the countdowns feeding them.
//!
//! The server pings every 5s and considers a connection idle after 10s
//! without client traffic. Tests shorten both intervals.

use std::pin::pin;
use std::time::{Duration, Instant};

use actix_web::web::Bytes;
use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use async_graphql::http::{WebSocket, WebSocketProtocols, WsMessage};
use futures_util::StreamExt;
use futures_util::stream::unfold;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::time;
use tracing::{debug, warn};

use super::schema::GraphqlSchema;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Client frames queued ahead of the protocol state machine.
const INBOUND_BUFFER: usize = 32;

pub(super) async fn handle_subscription_session(
    schema: GraphqlSchema,
    protocol: WebSocketProtocols,
    session: Session,
    stream: MessageStream,
) {
    SubscriptionSession::new(schema, protocol)
        .run(session, stream)
        .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Backlog,
    Network(Closed),
    GraphqlClosed(CloseReason),
    GraphqlFinished,
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct SubscriptionSession {
    schema: GraphqlSchema,
    protocol: WebSocketProtocols,
}

impl SubscriptionSession {
    fn new(schema: GraphqlSchema, protocol: WebSocketProtocols) -> Self {
        Self { schema, protocol }
    }

    async fn run(self, mut session: Session, mut stream: MessageStream) {
        let (frames, inbound) = mpsc::channel::<Bytes>(INBOUND_BUFFER);
        let inbound = unfold(inbound, |mut inbound| async move {
            inbound.recv().await.map(|frame| (frame, inbound))
        });
        let mut graphql = pin!(WebSocket::new(self.schema, inbound, self.protocol));

        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    Self::handle_stream_message(&mut session, &frames, &mut last_heartbeat, message)
                        .await
                }
                outgoing = graphql.next() => {
                    Self::forward_outgoing(&mut session, outgoing).await
                }
            };

            if let Err(error) = result {
                Self::log_shutdown_reason(&error);
                let close_action = Self::close_action_for(error);
                Self::close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        session: &mut Session,
        frames: &mpsc::Sender<Bytes>,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => Self::handle_message(session, frames, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        session: &mut Session,
        frames: &mpsc::Sender<Bytes>,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        *last_heartbeat = Instant::now();
        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => Self::enqueue(frames, text.into_bytes()),
            Message::Binary(bytes) => Self::enqueue(frames, bytes),
            Message::Pong(_) | Message::Continuation(_) | Message::Nop => Ok(()),
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    fn enqueue(frames: &mpsc::Sender<Bytes>, frame: Bytes) -> Result<(), SessionError> {
        frames.try_send(frame).map_err(|error| match error {
            TrySendError::Full(_) => SessionError::Backlog,
            TrySendError::Closed(_) => SessionError::GraphqlFinished,
        })
    }

    async fn forward_outgoing(
        session: &mut Session,
        outgoing: Option<WsMessage>,
    ) -> Result<(), SessionError> {
        match outgoing {
            Some(WsMessage::Text(text)) => session.text(text).await.map_err(SessionError::Network),
            Some(WsMessage::Close(code, reason)) => Err(SessionError::GraphqlClosed(CloseReason {
                code: CloseCode::from(code),
                description: Some(reason),
            })),
            None => Err(SessionError::GraphqlFinished),
        }
    }

    fn log_shutdown_reason(error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("GraphQL WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "GraphQL WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "GraphQL WebSocket send failed; closing connection");
            }
            SessionError::Backlog => {
                warn!("GraphQL WebSocket client outpaced the server; closing connection");
            }
            SessionError::GraphqlClosed(reason) => {
                debug!(code = ?reason.code, reason = ?reason.description, "GraphQL protocol closed the connection");
            }
            SessionError::ClientClosed(_)
            | SessionError::StreamClosed
            | SessionError::GraphqlFinished => {
                debug!("GraphQL WebSocket session ended");
            }
        }
    }

    fn close_action_for(error: SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::Backlog => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("too many pending messages".to_owned()),
            })),
            SessionError::GraphqlClosed(reason) => CloseAction::Close(Some(reason)),
            SessionError::GraphqlFinished => CloseAction::Close(Some(CloseCode::Normal.into())),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close GraphQL WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
