use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the runtime.
///
/// A page declares its subscriptions from state (for example "an autoplay
/// timer while the carousel is playing"). After every update the runtime
/// compares the declared set with the running one by [`SubscriptionId`], so
/// declaring the same id twice never starts a second task.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity used to diff subscriptions between update cycles: a source type
/// plus a numeric discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Create an ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Create an ID from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }

    /// Create an ID from a type and a string discriminant.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        let mut hasher = std::hash::DefaultHasher::new();
        s.hash(&mut hasher);
        Self::new::<T>(hasher.finish())
    }
}

/// A type that produces a stream of values, started once per subscription.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Identity of this source instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream. Dropped when the subscription is removed.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
///
/// The source's stream is only built once the runtime starts the
/// subscription, so declaring one is cheap and needs no tokio runtime.
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    Subscription {
        id: source.id(),
        spawn: Box::new(move |tx| {
            let handle = tokio::spawn(forward(source.stream(), tx));
            handle.abort_handle()
        }),
    }
}

async fn forward<Msg>(mut stream: BoxStream<'static, Msg>, tx: mpsc::UnboundedSender<Msg>) {
    while let Some(msg) = stream.next().await {
        if tx.send(msg).is_err() {
            break;
        }
    }
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from an already built stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| tokio::spawn(forward(stream, tx)).abort_handle()),
        }
    }

    /// The identity this subscription is diffed by.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                // Ends on its own once the source is aborted and inner_tx drops.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                abort
            }),
        }
    }
}

/// Running subscriptions keyed by id.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start ids that are new, abort ids that disappeared, leave the rest.
    pub fn reconcile(&mut self, declared: Vec<Subscription<Msg>>) {
        let mut declared: HashMap<SubscriptionId, Subscription<Msg>> = declared
            .into_iter()
            .map(|sub| (sub.id.clone(), sub))
            .collect();

        self.active.retain(|id, handle| {
            let keep = declared.contains_key(id);
            if !keep {
                tracing::trace!(?id, "subscription stopped");
                handle.abort();
            }
            keep
        });

        for (id, sub) in declared.drain() {
            if !self.active.contains_key(&id) {
                tracing::trace!(?id, "subscription started");
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Autoplay;
    struct Debounce;

    fn pending(id: SubscriptionId) -> Subscription<i32> {
        Subscription::from_stream(id, Box::pin(futures::stream::pending()))
    }

    #[test]
    fn subscription_id_equality() {
        assert_eq!(SubscriptionId::of::<Autoplay>(), SubscriptionId::of::<Autoplay>());
        assert_ne!(SubscriptionId::of::<Autoplay>(), SubscriptionId::of::<Debounce>());
    }

    #[test]
    fn subscription_id_discriminants() {
        assert_ne!(
            SubscriptionId::new::<Autoplay>(1),
            SubscriptionId::new::<Autoplay>(2)
        );
        assert_eq!(
            SubscriptionId::with_str::<Autoplay>("carousel"),
            SubscriptionId::with_str::<Autoplay>("carousel")
        );
        assert_ne!(
            SubscriptionId::with_str::<Autoplay>("carousel"),
            SubscriptionId::with_str::<Autoplay>("ticker")
        );
    }

    #[test]
    fn declaring_a_timer_needs_no_runtime() {
        let sub = subscribe(crate::subscriptions::Every::new(
            std::time::Duration::from_secs(5),
            "carousel-autoplay",
        ))
        .map(|_| ());
        assert_eq!(
            sub.id(),
            &SubscriptionId::with_str::<crate::subscriptions::Every>("carousel-autoplay")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn declared_timer_ticks_once_started() {
        let (tx, mut rx) = mpsc::unbounded_channel::<&str>();
        let mut manager = SubscriptionManager::new(tx);

        let sub = subscribe(crate::subscriptions::Every::new(
            std::time::Duration::from_secs(5),
            "carousel-autoplay",
        ))
        .map(|_| "tick");
        manager.reconcile(vec![sub]);

        assert_eq!(rx.recv().await, Some("tick"));
    }

    #[tokio::test]
    async fn reconcile_starts_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![pending(SubscriptionId::of::<Autoplay>())]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn redeclaring_same_id_keeps_one_task() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![
            pending(SubscriptionId::of::<Autoplay>()),
            pending(SubscriptionId::of::<Autoplay>()),
        ]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![pending(SubscriptionId::of::<Autoplay>())]);
        assert_eq!(manager.active_count(), 1);
    }

    #[tokio::test]
    async fn shutdown_aborts_everything() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![
            pending(SubscriptionId::of::<Autoplay>()),
            pending(SubscriptionId::of::<Debounce>()),
        ]);
        assert_eq!(manager.active_count(), 2);

        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn mapped_subscription_forwards_messages() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut manager = SubscriptionManager::new(tx);

        let sub = Subscription::from_stream(
            SubscriptionId::of::<Autoplay>(),
            Box::pin(futures::stream::iter(vec![1, 2])),
        )
        .map(|n: i32| format!("tick {n}"));
        manager.reconcile(vec![sub]);

        assert_eq!(rx.recv().await.as_deref(), Some("tick 1"));
        assert_eq!(rx.recv().await.as_deref(), Some("tick 2"));
    }
}
