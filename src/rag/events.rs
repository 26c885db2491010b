//! Progress events published while a question runs
//!
//! The pipeline never blocks on a slow consumer: events go through a bounded
//! channel with `try_send` and are dropped when it is full. The one exception
//! is [`EventBus::emit_and_wait`], used before a backend takes over the console.

use tokio::sync::{mpsc, oneshot};

/// Channel capacity
const EVENT_BUFFER: usize = 100;

/// Pipeline lifecycle and progress events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Searching { query: String },
    TitlesFound { titles: Vec<String> },
    /// Search came back empty and the generator will be asked without context
    NoResultsFallback,
    Retrieving { title: String },
    RetrievalFailed { title: String, error: String },
    ContextAssembled { articles: usize, truncated: usize },
    Generating { backend: String, streams: bool },
    Completed { duration_ms: u64 },
    Failed { stage: String, error: String },
}

#[derive(Debug)]
struct Envelope {
    event: PipelineEvent,
    handled: Option<oneshot::Sender<()>>,
}

/// Publisher half handed to the pipeline
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: mpsc::Sender<Envelope>,
}

/// Consumer half
///
/// An event counts as handled once the consumer asks for the next one or
/// drops the receiver.
#[derive(Debug)]
pub struct EventReceiver {
    receiver: mpsc::Receiver<Envelope>,
    pending: Option<oneshot::Sender<()>>,
}

impl EventBus {
    pub fn new() -> (Self, EventReceiver) {
        let (sender, receiver) = mpsc::channel(EVENT_BUFFER);
        (
            EventBus { sender },
            EventReceiver {
                receiver,
                pending: None,
            },
        )
    }

    pub fn emit(&self, event: PipelineEvent) {
        let envelope = Envelope {
            event,
            handled: None,
        };
        if let Err(e) = self.sender.try_send(envelope) {
            tracing::trace!(error = %e, "pipeline event dropped");
        }
    }

    /// Publish `event` and wait until the consumer has handled it
    ///
    /// Returns immediately when the event cannot be queued.
    pub async fn emit_and_wait(&self, event: PipelineEvent) {
        let (handled, done) = oneshot::channel();
        let envelope = Envelope {
            event,
            handled: Some(handled),
        };

        if let Err(e) = self.sender.try_send(envelope) {
            tracing::trace!(error = %e, "pipeline event dropped");
            return;
        }

        // Err means the consumer went away, which also ends the wait
        let _ = done.await;
    }
}

impl EventReceiver {
    /// Next event, or `None` once every bus is dropped
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        if let Some(handled) = self.pending.take() {
            let _ = handled.send(());
        }

        let envelope = self.receiver.recv().await?;
        self.pending = envelope.handled;
        Some(envelope.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_event_emission() {
        let (bus, mut receiver) = EventBus::new();
        bus.emit(PipelineEvent::Searching {
            query: "rust".to_string(),
        });

        assert_eq!(
            receiver.recv().await,
            Some(PipelineEvent::Searching {
                query: "rust".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_full_channel_drops_instead_of_blocking() {
        let (bus, mut receiver) = EventBus::new();
        for _ in 0..EVENT_BUFFER + 10 {
            bus.emit(PipelineEvent::NoResultsFallback);
        }
        drop(bus);

        let mut received = 0;
        while receiver.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, EVENT_BUFFER);
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (bus, receiver) = EventBus::new();
        drop(receiver);
        bus.emit(PipelineEvent::NoResultsFallback);
    }

    #[tokio::test]
    async fn test_emit_and_wait_blocks_until_handled() {
        let (bus, mut receiver) = EventBus::new();
        let event = PipelineEvent::Generating {
            backend: "command 'ollama'".to_string(),
            streams: true,
        };

        let waiter = tokio::spawn({
            let event = event.clone();
            async move { bus.emit_and_wait(event).await }
        });

        assert_eq!(receiver.recv().await, Some(event));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        // asking for the next event marks the previous one handled
        assert_eq!(receiver.recv().await, None);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_emit_and_wait_without_consumer() {
        let (bus, receiver) = EventBus::new();
        drop(receiver);
        tokio::time::timeout(
            Duration::from_secs(1),
            bus.emit_and_wait(PipelineEvent::NoResultsFallback),
        )
        .await
        .unwrap();
    }
}
