//! Per-field in-flight bookkeeping for refinements.
//!
//! Only one refinement may run for a given field; different fields refine
//! independently. The returned guard releases the field when dropped, so an
//! abandoned request never leaves the field locked.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::report::TextField;

#[derive(Debug, Default)]
pub struct RefinementTracker {
    in_flight: Mutex<HashSet<TextField>>,
}

impl RefinementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `field`; `None` when a refinement for it is already running.
    pub fn begin(self: &Arc<Self>, field: TextField) -> Option<RefinementGuard> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(field) {
            return None;
        }
        Some(RefinementGuard {
            tracker: Arc::clone(self),
            field,
        })
    }

    pub fn is_in_flight(&self, field: TextField) -> bool {
        self.in_flight.lock().contains(&field)
    }

    pub fn in_flight(&self) -> Vec<TextField> {
        let in_flight = self.in_flight.lock();
        TextField::ALL
            .into_iter()
            .filter(|field| in_flight.contains(field))
            .collect()
    }

    fn release(&self, field: TextField) {
        self.in_flight.lock().remove(&field);
    }
}

#[derive(Debug)]
pub struct RefinementGuard {
    tracker: Arc<RefinementTracker>,
    field: TextField,
}

impl RefinementGuard {
    pub fn field(&self) -> TextField {
        self.field
    }
}

impl Drop for RefinementGuard {
    fn drop(&mut self) {
        self.tracker.release(self.field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_field_is_exclusive() {
        let tracker = Arc::new(RefinementTracker::new());
        let guard = tracker.begin(TextField::MealMenu).unwrap();
        assert_eq!(guard.field(), TextField::MealMenu);
        assert!(tracker.begin(TextField::MealMenu).is_none());
        assert!(tracker.is_in_flight(TextField::MealMenu));

        drop(guard);
        assert!(!tracker.is_in_flight(TextField::MealMenu));
        assert!(tracker.begin(TextField::MealMenu).is_some());
    }

    #[test]
    fn test_different_fields_run_together() {
        let tracker = Arc::new(RefinementTracker::new());
        let _a = tracker.begin(TextField::CanteenReport).unwrap();
        let _b = tracker.begin(TextField::ToiletReport).unwrap();
        assert_eq!(
            tracker.in_flight(),
            vec![TextField::CanteenReport, TextField::ToiletReport]
        );
    }
}
