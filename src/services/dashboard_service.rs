use chrono::{DateTime, Duration, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::models::{DashboardStats, Order, OrderStatus, Revenue};

pub const WEEK_WINDOW_DAYS: i64 = 7;
pub const MONTH_WINDOW_DAYS: i64 = 30;

/// Aggregates the order collection into dashboard statistics.
///
/// "Today" is the calendar day of `now` in `offset`. Week and month are the
/// trailing windows `(now - 7d, now]` and `(now - 30d, now]`. Orders stamped
/// after `now` fall in no window. Cancelled orders are counted but never add
/// revenue.
pub fn compute_stats(orders: &[Order], now: DateTime<Utc>, offset: FixedOffset) -> DashboardStats {
    let today = now.with_timezone(&offset).date_naive();
    let week_start = now - Duration::days(WEEK_WINDOW_DAYS);
    let month_start = now - Duration::days(MONTH_WINDOW_DAYS);

    let mut stats = DashboardStats::default();
    let mut revenue = Revenue::default();

    for order in orders {
        if !order.status.is_terminal() {
            stats.pending_orders += 1;
        }

        if order.created_at > now {
            continue;
        }

        let earns = order.status != OrderStatus::Cancelled;
        let amount = if earns {
            order.total_amount
        } else {
            Decimal::ZERO
        };

        if order.created_at.with_timezone(&offset).date_naive() == today {
            stats.today_orders += 1;
            revenue.today += amount;
        }
        if order.created_at > week_start {
            stats.weekly_orders += 1;
            revenue.week += amount;
        }
        if order.created_at > month_start {
            stats.monthly_orders += 1;
            revenue.month += amount;
        }
    }

    stats.revenue = revenue;
    stats
}
