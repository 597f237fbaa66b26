use tokio::sync::broadcast;
use tracing::debug;

use surety_common::SuretyEvent;

/// Fan-out of [`SuretyEvent`]s to any number of subscribers.
///
/// Publishing never blocks; a subscriber that falls more than `capacity`
/// events behind sees `RecvError::Lagged` and skips ahead.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SuretyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Returns how many subscribers received the event.
    pub fn publish(&self, event: SuretyEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No subscribers for {:?}", event);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SuretyEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::Principal;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        let delivered = bus.publish(SuretyEvent::OperatingStatusChanged {
            operational: false,
            changed_by: Principal::from("owner"),
        });
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_every_subscriber_gets_a_copy() {
        let bus = EventBus::new(4);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = SuretyEvent::Withdrawal {
            passenger: Principal::from("p1"),
            amount: 15,
        };
        assert_eq!(bus.publish(event.clone()), 2);
        assert_eq!(a.try_recv().unwrap(), event);
        assert_eq!(b.try_recv().unwrap(), event);
    }
}
