//! Event collation across a commit sweep

use crate::target::same_target;
use crate::{Target, TxnEvent};
use std::sync::Arc;

/// Per-target ordered event list produced by collation
pub(crate) type CollatedEvents = Vec<(Arc<dyn Target>, Vec<TxnEvent>)>;

/// Merge event streams from all committed operations into per-target lists.
///
/// Pairs are folded in production order. When an equal `(target, event)` pair
/// recurs, the earlier occurrence is removed and the event re-appended, so a
/// duplicate collapses to a single entry at its most recent insertion point.
/// Distinct events for one target keep the relative order of first
/// production; target buckets keep first-appearance order.
pub(crate) fn collate<I>(streams: I) -> CollatedEvents
where
    I: IntoIterator<Item = Vec<(Arc<dyn Target>, TxnEvent)>>,
{
    let mut merged: CollatedEvents = Vec::new();

    for stream in streams {
        for (target, event) in stream {
            match merged.iter_mut().find(|(t, _)| same_target(t, &target)) {
                Some((_, events)) => {
                    events.retain(|e| *e != event);
                    events.push(event);
                }
                None => merged.push((target, vec![event])),
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DispatchError;

    struct Named(&'static str);

    impl Target for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn dispatch(&self, _event: &TxnEvent) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    fn ev(kind: &str) -> TxnEvent {
        TxnEvent::domain(kind, vec![])
    }

    #[test]
    fn distinct_events_keep_production_order() {
        let t: Arc<dyn Target> = Arc::new(Named("t"));
        let merged = collate([
            vec![(t.clone(), ev("a"))],
            vec![(t.clone(), ev("b")), (t.clone(), ev("c"))],
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1, vec![ev("a"), ev("b"), ev("c")]);
    }

    #[test]
    fn duplicate_collapses_to_latest_position() {
        let t: Arc<dyn Target> = Arc::new(Named("t"));
        let merged = collate([
            vec![(t.clone(), ev("a")), (t.clone(), ev("b"))],
            vec![(t.clone(), ev("a"))],
        ]);

        assert_eq!(merged[0].1, vec![ev("b"), ev("a")]);
    }

    #[test]
    fn buckets_keep_first_appearance_order() {
        let x: Arc<dyn Target> = Arc::new(Named("x"));
        let y: Arc<dyn Target> = Arc::new(Named("y"));
        let merged = collate([
            vec![(x.clone(), ev("a")), (y.clone(), ev("b"))],
            vec![(x.clone(), ev("c"))],
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].0.name(), "x");
        assert_eq!(merged[0].1, vec![ev("a"), ev("c")]);
        assert_eq!(merged[1].0.name(), "y");
    }

    #[test]
    fn same_event_different_targets_not_deduplicated() {
        let x: Arc<dyn Target> = Arc::new(Named("x"));
        let y: Arc<dyn Target> = Arc::new(Named("y"));
        let merged = collate([vec![(x.clone(), ev("a")), (y.clone(), ev("a"))]]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].1, vec![ev("a")]);
        assert_eq!(merged[1].1, vec![ev("a")]);
    }
}
