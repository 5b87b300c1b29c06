//! Time-driven delivery progression.
//!
//! An order moves `Placed → Shipped → Out for delivery → Delivered` as time since
//! placement crosses each threshold of the [`DeliverySchedule`]. Progression is computed
//! from `now`, never from how often it is asked, so a late or repeated check lands in the
//! same state as a punctual one.

use crate::model::{Order, OrderStatus, TimelineEntry};
use chrono::{DateTime, Duration, Utc};

/// Elapsed time after placement at which each status becomes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySchedule {
    pub shipped_after: Duration,
    pub out_for_delivery_after: Duration,
    pub delivered_after: Duration,
}

impl Default for DeliverySchedule {
    fn default() -> Self {
        Self {
            shipped_after: Duration::minutes(3),
            out_for_delivery_after: Duration::minutes(4),
            delivered_after: Duration::minutes(5),
        }
    }
}

impl DeliverySchedule {
    /// Threshold for entering `status`. `None` for statuses that are never reached by time.
    pub fn due_after(&self, status: &OrderStatus) -> Option<Duration> {
        match status {
            OrderStatus::Shipped => Some(self.shipped_after),
            OrderStatus::OutForDelivery => Some(self.out_for_delivery_after),
            OrderStatus::Delivered => Some(self.delivered_after),
            OrderStatus::Placed | OrderStatus::Unknown(_) => None,
        }
    }

    /// Thresholds are non-negative and non-decreasing.
    pub fn is_ordered(&self) -> bool {
        Duration::zero() <= self.shipped_after
            && self.shipped_after <= self.out_for_delivery_after
            && self.out_for_delivery_after <= self.delivered_after
    }
}

/// Applies every transition due at `now`, in canonical order, each stamped with `now`.
///
/// Returns the statuses appended to the timeline; empty when nothing was due. The status
/// never moves backwards and no status is appended twice.
pub fn advance(order: &mut Order, now: DateTime<Utc>, schedule: &DeliverySchedule) -> Vec<OrderStatus> {
    let elapsed = order.elapsed(now);
    let mut appended = Vec::new();

    while let Some(next) = order.status.next() {
        match schedule.due_after(&next) {
            Some(due) if elapsed >= due => {
                order.timeline.push(TimelineEntry {
                    status: next.clone(),
                    timestamp: now,
                });
                order.status = next.clone();
                appended.push(next);
            }
            _ => break,
        }
    }

    appended
}

/// Tracking-bar progress for a status: 25/50/75/100, 0 for an unrecognized status.
pub fn progress_percentage(status: &OrderStatus) -> u8 {
    match status {
        OrderStatus::Placed => 25,
        OrderStatus::Shipped => 50,
        OrderStatus::OutForDelivery => 75,
        OrderStatus::Delivered => 100,
        OrderStatus::Unknown(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, PaymentDescriptor, PaymentMethod, Totals};

    fn placed_order(at: DateTime<Utc>) -> Order {
        Order {
            order_id: OrderId::from("ORD0_TEST"),
            items: Vec::new(),
            totals: Totals::default(),
            payment: PaymentDescriptor::for_method(PaymentMethod::CashOnDelivery),
            address: "Delhi".into(),
            placed_at: at,
            status: OrderStatus::Placed,
            timeline: vec![TimelineEntry {
                status: OrderStatus::Placed,
                timestamp: at,
            }],
        }
    }

    fn statuses(order: &Order) -> Vec<OrderStatus> {
        order.timeline.iter().map(|e| e.status.clone()).collect()
    }

    #[test]
    fn nothing_is_due_before_three_minutes() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        let schedule = DeliverySchedule::default();

        assert!(advance(&mut order, t0 + Duration::minutes(2), &schedule).is_empty());
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.timeline.len(), 1);
    }

    #[test]
    fn transitions_follow_the_schedule() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        let schedule = DeliverySchedule::default();

        let at3 = t0 + Duration::minutes(3);
        assert_eq!(advance(&mut order, at3, &schedule), vec![OrderStatus::Shipped]);
        assert_eq!(order.timeline[1].timestamp, at3);

        let at3_5 = t0 + Duration::seconds(210);
        assert!(advance(&mut order, at3_5, &schedule).is_empty());

        let at4 = t0 + Duration::minutes(4);
        assert_eq!(advance(&mut order, at4, &schedule), vec![OrderStatus::OutForDelivery]);

        let at5 = t0 + Duration::minutes(5);
        assert_eq!(advance(&mut order, at5, &schedule), vec![OrderStatus::Delivered]);
        assert_eq!(
            statuses(&order),
            vec![
                OrderStatus::Placed,
                OrderStatus::Shipped,
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered
            ]
        );
    }

    #[test]
    fn a_late_check_catches_up_in_order() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        let late = t0 + Duration::minutes(30);

        let appended = advance(&mut order, late, &DeliverySchedule::default());
        assert_eq!(
            appended,
            vec![OrderStatus::Shipped, OrderStatus::OutForDelivery, OrderStatus::Delivered]
        );
        assert!(order.timeline.iter().skip(1).all(|e| e.timestamp == late));
    }

    #[test]
    fn delivered_is_terminal_and_repeats_are_noops() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        let schedule = DeliverySchedule::default();
        advance(&mut order, t0 + Duration::minutes(6), &schedule);
        let settled = order.clone();

        assert!(advance(&mut order, t0 + Duration::minutes(60), &schedule).is_empty());
        assert_eq!(order, settled);
    }

    #[test]
    fn clock_before_placement_does_nothing() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        assert!(advance(&mut order, t0 - Duration::minutes(10), &DeliverySchedule::default()).is_empty());
    }

    #[test]
    fn unknown_status_is_left_alone() {
        let t0 = DateTime::from_timestamp(1_000_000, 0).unwrap();
        let mut order = placed_order(t0);
        order.status = OrderStatus::Unknown("Returned".into());

        assert!(advance(&mut order, t0 + Duration::minutes(10), &DeliverySchedule::default()).is_empty());
        assert_eq!(progress_percentage(&order.status), 0);
    }

    #[test]
    fn progress_by_status() {
        assert_eq!(progress_percentage(&OrderStatus::Placed), 25);
        assert_eq!(progress_percentage(&OrderStatus::Shipped), 50);
        assert_eq!(progress_percentage(&OrderStatus::OutForDelivery), 75);
        assert_eq!(progress_percentage(&OrderStatus::Delivered), 100);
    }

    #[test]
    fn schedule_ordering() {
        assert!(DeliverySchedule::default().is_ordered());
        let backwards = DeliverySchedule {
            shipped_after: Duration::minutes(5),
            ..DeliverySchedule::default()
        };
        assert!(!backwards.is_ordered());
    }
}
