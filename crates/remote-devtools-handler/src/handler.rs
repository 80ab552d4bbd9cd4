//! Response correlation and event dispatch over a byte stream.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicI64, Ordering},
    },
};

use remote_devtools_core::{
    Context, Error, EventBus, EventSubscriber, Executor, MethodType, OutcomeReceiver,
    OutcomeSender, RawMessage, outcome,
};
use remote_devtools_protocol::{Inbound, Message, MessageId, Request};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    sync::mpsc,
};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::config::HandlerConfig;

/// Handler error.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Reading from or writing to the stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An inbound frame was not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Default)]
struct Pending {
    closed: bool,
    senders: HashMap<MessageId, OutcomeSender>,
}

struct Inner {
    config: HandlerConfig,
    next_id: AtomicI64,
    pending: Mutex<Pending>,
    outbound: mpsc::UnboundedSender<String>,
    events: EventBus,
    shutdown: CancellationToken,
}

/// Executor speaking newline-delimited JSON frames to one remote target.
///
/// Commands are written by a background writer task, so [`Executor::execute`]
/// never waits. A background reader task routes each response to the
/// outcome channel of its request and publishes events to the handler's
/// [`EventBus`]. When the stream ends, errors, or [`TargetHandler::shutdown`]
/// is called, every pending command and event wait observes a closed channel.
/// Dropping the last clone shuts the handler down as well.
#[derive(Clone)]
pub struct TargetHandler {
    inner: Arc<Inner>,
    _shutdown_on_drop: Arc<DropGuard>,
}

impl TargetHandler {
    /// Start a handler over separate read and write halves.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn spawn<R, W>(reader: R, writer: W, config: HandlerConfig) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let handler = Self {
            _shutdown_on_drop: Arc::new(shutdown.clone().drop_guard()),
            inner: Arc::new(Inner {
                events: EventBus::with_buffer(config.event_buffer),
                config,
                next_id: AtomicI64::new(0),
                pending: Mutex::new(Pending::default()),
                outbound,
                shutdown,
            }),
        };

        let writer_inner = Arc::clone(&handler.inner);
        tokio::spawn(async move {
            if let Err(e) = writer_inner.write_loop(writer, outbound_rx).await {
                tracing::error!("Target writer loop error: {e}");
            }
            writer_inner.close();
        });

        let reader_inner = Arc::clone(&handler.inner);
        tokio::spawn(async move {
            if let Err(e) = reader_inner.read_loop(reader).await {
                tracing::error!("Target reader loop error: {e}");
            }
            reader_inner.close();
        });

        handler
    }

    /// Start a handler over a single bidirectional stream.
    #[must_use]
    pub fn from_stream<S>(stream: S, config: HandlerConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read, write) = tokio::io::split(stream);
        Self::spawn(BufReader::new(read), write, config)
    }

    /// Stop both background tasks and fail everything still waiting.
    pub fn shutdown(&self) {
        self.inner.close();
    }

    /// Returns true once the handler has shut down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Number of commands still awaiting a response.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending().senders.len()
    }

    /// The handler's event subscription table.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.inner.events
    }

    /// The configuration this handler was started with.
    #[must_use]
    pub fn config(&self) -> &HandlerConfig {
        &self.inner.config
    }
}

impl Executor for TargetHandler {
    fn execute(&self, ctx: &Context, method: MethodType, params: RawMessage) -> OutcomeReceiver {
        if let Some(err) = ctx.err() {
            return OutcomeReceiver::ready(Err(err.into()));
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = match Request::encode(id, &method, &params) {
            Ok(frame) => frame,
            Err(e) => return OutcomeReceiver::ready(Err(Error::Encode(e))),
        };

        let (tx, rx) = outcome::channel();
        {
            let mut pending = self.inner.pending();
            if pending.closed {
                return OutcomeReceiver::ready(Err(Error::ChannelClosed));
            }
            let before = pending.senders.len();
            pending.senders.retain(|_, sender| !sender.is_abandoned());
            let swept = before - pending.senders.len();
            if swept > 0 {
                tracing::trace!(swept, "dropped abandoned commands");
            }
            pending.senders.insert(id, tx);
        }

        tracing::debug!(id, %method, "execute");
        if self.inner.outbound.send(frame).is_err() {
            // writer is gone; dropping the sender closes the channel
            self.inner.pending().senders.remove(&id);
        }
        rx
    }

    fn events(&self) -> Option<&dyn EventSubscriber> {
        Some(&self.inner.events)
    }
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn close(&self) {
        self.shutdown.cancel();
        let abandoned: Vec<_> = {
            let mut pending = self.pending();
            pending.closed = true;
            pending.senders.drain().collect()
        };
        if !abandoned.is_empty() {
            tracing::debug!(count = abandoned.len(), "closing pending commands");
        }
        drop(abandoned);
        self.events.close();
    }

    async fn write_loop<W>(
        &self,
        mut writer: W,
        mut outbound: mpsc::UnboundedReceiver<String>,
    ) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin,
    {
        loop {
            let frame = tokio::select! {
                () = self.shutdown.cancelled() => break,
                frame = outbound.recv() => match frame {
                    Some(frame) => frame,
                    None => break,
                },
            };
            if self.config.trace_frames {
                tracing::trace!(%frame, "->");
            }
            writer.write_all(frame.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok(())
    }

    async fn read_loop<R>(&self, mut reader: R) -> Result<(), HandlerError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                line_result = reader.read_until(b'\n', &mut buffer) => {
                    match line_result {
                        Ok(0) => break, // EOF
                        Ok(_) => {
                            let frame = buffer.trim_ascii();
                            if frame.is_empty() {
                                continue;
                            }
                            if let Err(e) = self.dispatch(frame) {
                                tracing::warn!("Skipping frame from target: {e}");
                            }
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch(&self, frame: &[u8]) -> Result<(), HandlerError> {
        if self.config.trace_frames {
            tracing::trace!(frame = %String::from_utf8_lossy(frame), "<-");
        }

        let message = Message::parse(frame)?;

        match message.classify() {
            Some(Inbound::Response { id, outcome }) => {
                let sender = self.pending().senders.remove(&id);
                match sender {
                    Some(sender) => {
                        if !sender.deliver(outcome) {
                            tracing::trace!(id, "discarding response for abandoned command");
                        }
                    }
                    None => tracing::debug!(id, "response for unknown command"),
                }
            }
            Some(Inbound::Event(event)) => {
                let notified = self.events.publish(&event);
                tracing::trace!(method = %event.method, notified, "event");
            }
            None => tracing::warn!("Frame is neither a response nor an event"),
        }
        Ok(())
    }
}
