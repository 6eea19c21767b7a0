//! Anchor width observation for the floating candidate list.
//!
//! The anchor control owns an [`AnchorObserver`] and publishes its rendered
//! width whenever it lays out. The popover holds the matching
//! [`AnchorWidth`] and reads the latest value when it renders. The value
//! flows one way over a `watch` channel, so the last published width wins
//! and intermediate updates may be skipped.

use tokio::sync::watch;
use tracing::trace;

/// Publishing half, owned by the anchor.
#[derive(Debug)]
pub struct AnchorObserver {
    tx: Option<watch::Sender<Option<u16>>>,
}

/// Subscribing half, owned by the popover.
#[derive(Debug, Clone)]
pub struct AnchorWidth {
    rx: watch::Receiver<Option<u16>>,
}

/// Start observing an anchor.
///
/// No width is available until the anchor publishes its first measurement.
pub fn observe() -> (AnchorObserver, AnchorWidth) {
    let (tx, rx) = watch::channel(None);
    (AnchorObserver { tx: Some(tx) }, AnchorWidth { rx })
}

impl AnchorObserver {
    /// Publish the anchor's current width.
    ///
    /// Unchanged widths do not notify the subscriber. Publishing after
    /// [`detach`](Self::detach) is ignored.
    pub fn publish(&self, width: u16) {
        let Some(tx) = &self.tx else {
            return;
        };
        let changed = tx.send_if_modified(|current| {
            if *current == Some(width) {
                false
            } else {
                *current = Some(width);
                true
            }
        });
        if changed {
            trace!(width, "Anchor width changed");
        }
    }

    /// Stop observing. Safe to call more than once.
    pub fn detach(&mut self) {
        if self.tx.take().is_some() {
            trace!("Anchor observer detached");
        }
    }

    /// Check whether the observer is still attached.
    pub fn is_attached(&self) -> bool {
        self.tx.is_some()
    }
}

impl Drop for AnchorObserver {
    fn drop(&mut self) {
        self.detach();
    }
}

impl AnchorWidth {
    /// The last usable width.
    ///
    /// Returns `None` before the first measurement and when the anchor
    /// reported a zero width, which means it could not be measured. Callers
    /// fall back to content-based sizing in both cases.
    pub fn latest(&self) -> Option<u16> {
        let width = *self.rx.borrow();
        width.filter(|w| *w > 0)
    }

    /// Take the latest width if it changed since the last call.
    pub fn take_changed(&mut self) -> Option<Option<u16>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().filter(|w| *w > 0)),
            _ => None,
        }
    }

    /// Check whether the anchor is still being observed.
    pub fn is_observing(&self) -> bool {
        self.rx.has_changed().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_width_before_first_measurement() {
        let (_observer, width) = observe();
        assert_eq!(width.latest(), None);
        assert!(width.is_observing());
    }

    #[test]
    fn test_last_value_wins() {
        let (observer, width) = observe();
        observer.publish(40);
        observer.publish(52);
        assert_eq!(width.latest(), Some(52));
    }

    #[test]
    fn test_take_changed_only_reports_changes() {
        let (observer, mut width) = observe();
        observer.publish(30);
        assert_eq!(width.take_changed(), Some(Some(30)));
        assert_eq!(width.take_changed(), None);

        observer.publish(30);
        assert_eq!(width.take_changed(), None);

        observer.publish(31);
        assert_eq!(width.take_changed(), Some(Some(31)));
    }

    #[test]
    fn test_zero_width_falls_back() {
        let (observer, width) = observe();
        observer.publish(0);
        assert_eq!(width.latest(), None);
    }

    #[test]
    fn test_detach_stops_observation() {
        let (mut observer, width) = observe();
        observer.publish(20);
        observer.detach();

        assert!(!observer.is_attached());
        assert!(!width.is_observing());

        observer.publish(99);
        assert_eq!(width.latest(), Some(20));

        observer.detach();
    }

    #[test]
    fn test_drop_detaches() {
        let (observer, width) = observe();
        drop(observer);
        assert!(!width.is_observing());
    }

    #[test]
    fn test_instances_are_independent() {
        let (a, width_a) = observe();
        let (b, width_b) = observe();
        a.publish(10);
        b.publish(70);
        assert_eq!(width_a.latest(), Some(10));
        assert_eq!(width_b.latest(), Some(70));
    }
}
