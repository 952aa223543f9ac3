use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::{Event, EventStream};
use futures::{Stream, StreamExt};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, mpsc};
use tokio::task::AbortHandle;

/// Marker type identifying terminal-event listeners.
pub struct TerminalEvents;

const HUB_CAPACITY: usize = 256;

/// The shared reader and the channel it feeds.
struct Hub {
    generation: u64,
    feed: broadcast::Sender<TerminalEvent>,
    reader: AbortHandle,
}

static HUB: Mutex<Option<Hub>> = Mutex::new(None);
static GENERATION: AtomicU64 = AtomicU64::new(0);

fn lock_hub() -> MutexGuard<'static, Option<Hub>> {
    HUB.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A receiver on the shared feed. The last one to go stops the reader.
struct Listener {
    generation: u64,
    rx: broadcast::Receiver<TerminalEvent>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let mut hub = lock_hub();
        // Our own receiver is still alive here.
        let last = hub
            .as_ref()
            .is_some_and(|h| h.generation == self.generation && h.feed.receiver_count() <= 1);
        if last {
            if let Some(h) = hub.take() {
                tracing::debug!(generation = h.generation, "stopping terminal reader");
                h.reader.abort();
            }
        }
    }
}

/// Join the terminal event feed, starting its reader if none is running.
///
/// crossterm hands each event to exactly one reader, so listeners never read
/// the terminal themselves. A single task reads it and every listener gets
/// its own receiver. Must be called from inside a tokio runtime.
fn join_hub() -> Listener {
    join_hub_with(EventStream::new)
}

fn join_hub_with<S>(source: impl FnOnce() -> S) -> Listener
where
    S: Stream<Item = io::Result<Event>> + Send + Unpin + 'static,
{
    let mut hub = lock_hub();
    if let Some(h) = hub.as_ref().filter(|h| !h.reader.is_finished()) {
        return Listener {
            generation: h.generation,
            rx: h.feed.subscribe(),
        };
    }

    let generation = GENERATION.fetch_add(1, Ordering::Relaxed);
    let (feed, rx) = broadcast::channel(HUB_CAPACITY);
    let tx = feed.clone();
    let mut stream = source();
    let reader = tokio::spawn(async move {
        while let Some(event) = stream.next().await {
            match event {
                // No listeners is not an error; the event is simply dropped.
                Ok(event) => {
                    let _ = tx.send(TerminalEvent::from(event));
                }
                Err(err) => {
                    tracing::warn!(%err, "terminal event read failed");
                    break;
                }
            }
        }
        tracing::debug!(generation, "terminal event stream ended");
        // Drop the hub's sender too, so listeners see the feed close.
        let mut hub = lock_hub();
        if hub.as_ref().is_some_and(|h| h.generation == generation) {
            hub.take();
        }
    })
    .abort_handle();

    tracing::debug!(generation, "starting terminal reader");
    *hub = Some(Hub {
        generation,
        feed,
        reader,
    });
    Listener { generation, rx }
}

/// Subscribe to terminal events under the singleton listener id.
///
/// The `map` closure returns `Some(msg)` to forward an event or `None` to
/// discard it.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    terminal_events_with_id(SubscriptionId::of::<TerminalEvents>(), map)
}

/// Subscribe to terminal events under a caller-chosen id.
///
/// Use one id per owner (for instance, per widget instance) so that moving
/// focus from one owner to another stops the old listener and starts the
/// new one instead of being mistaken for an unchanged subscription.
pub fn terminal_events_with_id<Msg: Send + 'static>(
    id: SubscriptionId,
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);

    // Join the feed lazily inside the spawned task: `subscriptions()` runs on
    // every update and most of the returned values are discarded unstarted.
    Subscription {
        id,
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let handle = tokio::spawn(async move {
                let mut listener = join_hub();
                loop {
                    match listener.rx.recv().await {
                        Ok(event) => {
                            if let Some(msg) = map(event) {
                                if tx.send(msg).is_err() {
                                    break;
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "terminal listener lagged");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};
    use futures::stream;

    fn running_reader() -> Option<AbortHandle> {
        lock_hub().as_ref().map(|h| h.reader.clone())
    }

    async fn until_finished(reader: &AbortHandle) -> bool {
        for _ in 0..100 {
            if reader.is_finished() {
                return true;
            }
            tokio::task::yield_now().await;
        }
        reader.is_finished()
    }

    // A single test drives the process-wide hub so parallel tests cannot
    // race on it.
    #[tokio::test]
    async fn reader_lives_exactly_as_long_as_its_listeners() {
        let key = Event::Key(KeyEvent::from(KeyCode::Enter));
        let source = move || stream::iter(vec![Ok::<_, io::Error>(key)]).chain(stream::pending());

        let mut first = join_hub_with(source.clone());
        let mut second = join_hub_with(source);
        assert_eq!(first.generation, second.generation);

        for listener in [&mut first, &mut second] {
            match listener.rx.recv().await {
                Ok(TerminalEvent::Key(k)) => assert_eq!(k.code, KeyCode::Enter),
                other => panic!("expected a key event, got {other:?}"),
            }
        }

        let reader = running_reader().expect("reader started");
        let generation = first.generation;
        drop(first);
        assert!(running_reader().is_some());
        assert!(!reader.is_finished());

        drop(second);
        assert!(running_reader().is_none());
        assert!(until_finished(&reader).await);

        // A later listener gets a fresh reader.
        let third = join_hub_with(stream::pending::<io::Result<Event>>);
        assert_ne!(third.generation, generation);
        let fresh = running_reader().expect("fresh reader started");
        drop(third);
        assert!(running_reader().is_none());
        assert!(until_finished(&fresh).await);

        // A reader that fails shuts the feed, and its listeners see it close.
        let mut orphan =
            join_hub_with(|| stream::iter(vec![Err::<Event, _>(io::Error::other("no tty"))]));
        assert!(matches!(
            orphan.rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
        assert!(running_reader().is_none());
    }
}
