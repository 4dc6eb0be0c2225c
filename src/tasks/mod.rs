//! Background jobs started once at boot.
//!
//! Call `spawn_all` after the services are built; every job is idempotent and
//! loops on its own interval.

use crate::services::{NotificationService, PrizeService};

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(prize_service: PrizeService, notification_service: NotificationService) {
    // 奖品周期计数重置（每小时）
    {
        let svc = prize_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.reset_expired_counters().await {
                    Ok(n) if n > 0 => log::info!("Prize period counters reset: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to reset prize counters: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        });
    }

    // 餐厅不活跃检查（每 6 小时）
    {
        let svc = notification_service.clone();
        tokio::spawn(async move {
            loop {
                match svc.sweep_inactivity().await {
                    Ok(n) if n > 0 => log::info!("Inactivity notifications created: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to sweep inactive restaurants: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(6 * 3600)).await;
            }
        });
    }
}
