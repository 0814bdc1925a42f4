use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use service::maintenance::service::run_due_check;

/// Run the preventive maintenance due check every `interval`, starting immediately.
/// A failed pass is logged and the loop keeps going.
pub fn spawn(db: DatabaseConnection, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = interval.as_secs(), "maintenance scheduler started");
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            match run_due_check(&db, today).await {
                Ok(summary) => info!(
                    %today,
                    plans_checked = summary.plans_checked,
                    work_orders_created = summary.work_orders_created,
                    notifications_created = summary.notifications_created,
                    "scheduled due check finished"
                ),
                Err(e) => error!(%today, error = %e, "scheduled due check failed"),
            }
        }
    })
}
