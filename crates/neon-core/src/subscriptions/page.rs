use crate::event::PageEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Marker type giving the page input subscription its identity.
pub struct PageEvents;

/// Subscribe to terminal input as [`PageEvent`]s.
///
/// `map` returns `Some(msg)` to forward an event to the page or `None` to
/// discard it.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![page_events(|event| Some(Msg::Page(event)))]
/// }
/// ```
pub fn page_events<Msg: Send + 'static>(
    map: impl Fn(PageEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);

    // The EventStream is created inside the task. Creating it eagerly on
    // every subscriptions() call would poke crossterm's global reader while
    // the running stream is polling it.
    Subscription {
        id: SubscriptionId::of::<PageEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| -> AbortHandle {
            let handle = tokio::spawn(async move {
                let mut stream = EventStream::new();
                while let Some(result) = stream.next().await {
                    let event = match result {
                        Ok(event) => event,
                        Err(err) => {
                            tracing::warn!(%err, "terminal input error");
                            continue;
                        }
                    };
                    let Some(msg) = PageEvent::from_terminal(event).and_then(|e| map(e)) else {
                        continue;
                    };
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}
