//! Domain event bus with a synchronous and an asynchronous channel.
//!
//! The bus is passed around as an explicit handle; there is no global
//! singleton. Handlers on the synchronous channel run inline in the
//! publishing call and their errors propagate. Handlers on the
//! asynchronous channel are fed from a bounded queue by a dispatcher
//! task; each handler gets an independent delivery with bounded retry,
//! and exhausted retries surface only through logging.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::config::EventsConfig;
use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

type HandlerRegistry = HashMap<String, Vec<Arc<dyn EventHandler>>>;

/// Tuning knobs for the asynchronous channel.
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Queue capacity; publishers wait when the queue is full.
    pub channel_capacity: usize,
    /// Total delivery attempts per handler, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per further attempt, with
    /// the factor capped.
    pub retry_base_delay: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            max_attempts: 3,
            retry_base_delay: Duration::from_millis(50),
        }
    }
}

impl From<&EventsConfig> for EventBusConfig {
    fn from(config: &EventsConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            max_attempts: config.max_attempts,
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }
}

/// Two-channel in-process event bus.
///
/// Must be constructed inside a Tokio runtime; `new` spawns the
/// dispatcher task for the asynchronous channel. Dropping the bus (or
/// calling [`DomainEventBus::close`]) closes the queue; the dispatcher
/// drains what was accepted and then stops.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(DomainEventBus::new(EventBusConfig::default()));
/// bus.register("reservation.accepted.v1", notifier_handler);
///
/// bus.publish(envelope).await?;
/// bus.close().await; // drain, for deterministic shutdown
/// ```
pub struct DomainEventBus {
    sync_handlers: RwLock<HandlerRegistry>,
    async_handlers: Arc<RwLock<HandlerRegistry>>,
    sender: Mutex<Option<mpsc::Sender<EventEnvelope>>>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
    accepted: RwLock<Vec<EventEnvelope>>,
}

impl DomainEventBus {
    /// Creates the bus and spawns its dispatcher task.
    pub fn new(config: EventBusConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.channel_capacity);
        let async_handlers: Arc<RwLock<HandlerRegistry>> = Arc::new(RwLock::new(HashMap::new()));
        let dispatcher = tokio::spawn(dispatch_loop(
            receiver,
            Arc::clone(&async_handlers),
            config.max_attempts,
            config.retry_base_delay,
        ));

        Self {
            sync_handlers: RwLock::new(HashMap::new()),
            async_handlers,
            sender: Mutex::new(Some(sender)),
            dispatcher: Mutex::new(Some(dispatcher)),
            accepted: RwLock::new(Vec::new()),
        }
    }

    /// Closes the asynchronous channel and waits until the dispatcher
    /// has drained every accepted event.
    ///
    /// Further `publish` calls fail with `Infrastructure`. Used for
    /// deterministic tests and orderly shutdown.
    pub async fn close(&self) {
        self.sender.lock().await.take();
        if let Some(dispatcher) = self.dispatcher.lock().await.take() {
            if let Err(err) = dispatcher.await {
                error!(error = %err, "event dispatcher task ended abnormally");
            }
        }
    }

    // === Test Helpers ===

    /// Returns every event the asynchronous channel has accepted.
    pub fn accepted_events(&self) -> Vec<EventEnvelope> {
        self.accepted
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns accepted events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.accepted_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Checks whether an event of the given type was accepted.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.accepted_events()
            .iter()
            .any(|e| e.event_type == event_type)
    }

    fn record_accepted(&self, event: &EventEnvelope) {
        self.accepted
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn handlers_for(registry: &RwLock<HandlerRegistry>, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    fn add_handler(registry: &RwLock<HandlerRegistry>, event_type: &str, handler: Arc<dyn EventHandler>) {
        registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }
}

#[async_trait]
impl EventPublisher for DomainEventBus {
    async fn dispatch_sync(&self, events: &[EventEnvelope]) -> Result<(), DomainError> {
        for event in events {
            // Snapshot the handler list so no lock is held across awaits.
            let handlers = Self::handlers_for(&self.sync_handlers, &event.event_type);
            for handler in handlers {
                if let Err(err) = handler.handle(event.clone()).await {
                    error!(
                        handler = handler.name(),
                        event_type = %event.event_type,
                        error = %err,
                        "synchronous event handler failed"
                    );
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let sender = self.sender.lock().await.clone();
        let Some(sender) = sender else {
            return Err(DomainError::infrastructure("event bus is closed"));
        };
        self.record_accepted(&event);
        sender
            .send(event)
            .await
            .map_err(|_| DomainError::infrastructure("event dispatcher stopped"))
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for DomainEventBus {
    fn register_sync(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        Self::add_handler(&self.sync_handlers, event_type, handler);
    }

    fn register(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        Self::add_handler(&self.async_handlers, event_type, handler);
    }

    fn register_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        for event_type in event_types {
            Self::add_handler(&self.async_handlers, event_type, Arc::clone(&handler));
        }
    }
}

/// Consumes the queue until every sender is gone, delivering each event
/// to each registered handler independently.
async fn dispatch_loop(
    mut receiver: mpsc::Receiver<EventEnvelope>,
    handlers: Arc<RwLock<HandlerRegistry>>,
    max_attempts: u32,
    base_delay: Duration,
) {
    while let Some(event) = receiver.recv().await {
        let snapshot = DomainEventBus::handlers_for(&handlers, &event.event_type);
        for handler in snapshot {
            deliver_with_retry(&*handler, &event, max_attempts, base_delay).await;
        }
    }
}

/// Delivers one event to one handler, retrying on failure.
///
/// Exhausted retries are logged and swallowed: the originating caller
/// already committed and must not be failed from here.
async fn deliver_with_retry(
    handler: &dyn EventHandler,
    event: &EventEnvelope,
    max_attempts: u32,
    base_delay: Duration,
) {
    let mut attempt = 1;
    loop {
        match handler.handle(event.clone()).await {
            Ok(()) => return,
            Err(err) if attempt < max_attempts => {
                warn!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    attempt,
                    error = %err,
                    "event handler failed, retrying"
                );
                sleep(retry_delay(base_delay, attempt)).await;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    attempts = max_attempts,
                    error = %err,
                    "event handler failed, retries exhausted"
                );
                return;
            }
        }
    }
}

/// Factor ceiling for the retry backoff; delays top out at `base * 2^10`.
const MAX_BACKOFF_DOUBLINGS: u32 = 10;

/// Backoff before the retry that follows `attempt`: base, 2x, 4x, ...
///
/// The doubling saturates at [`MAX_BACKOFF_DOUBLINGS`], so an oversized
/// attempt budget cannot overflow the factor or the resulting duration.
fn retry_delay(base_delay: Duration, attempt: u32) -> Duration {
    let doublings = attempt.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
    base_delay.saturating_mul(2u32.saturating_pow(doublings))
}
