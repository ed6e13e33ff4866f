use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio_stream::wrappers::IntervalStream;

/// A repeating timer that fires every `period`.
///
/// The first tick arrives one full period after the subscription starts,
/// never immediately. Ticks missed while the event loop was busy are
/// delayed rather than burst.
///
/// # Example
///
/// ```rust,ignore
/// use neon_core::{subscribe, Every};
///
/// let autoplay = subscribe(Every::new(Duration::from_secs(5), "carousel-autoplay"))
///     .map(|_| Message::Tick);
/// ```
pub struct Every {
    /// The interval between ticks.
    pub period: Duration,
    /// Distinguishes this timer from other `Every` timers.
    pub id: &'static str,
}

impl Every {
    pub fn new(period: Duration, id: &'static str) -> Self {
        Self { period, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let period = self.period.max(Duration::from_millis(1));
        let mut interval =
            tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        Box::pin(IntervalStream::new(interval).map(|tick| tick.into_std()))
    }
}
