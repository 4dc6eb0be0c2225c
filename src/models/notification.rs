use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{NotificationPriority, NotificationType, notification_entity as notifications};

/// 按通知类型区分的附加数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationMetadata {
    HotLead {
        lead_id: i64,
        lead_name: String,
        lead_phone: String,
    },
    PrizeTrend {
        prize: String,
        count: i64,
    },
    Inactivity {
        days: i64,
        last_lead_at: DateTime<Utc>,
    },
    Milestone {
        milestone: i64,
    },
}

impl NotificationMetadata {
    pub fn notification_type(&self) -> NotificationType {
        match self {
            NotificationMetadata::HotLead { .. } => NotificationType::HotLead,
            NotificationMetadata::PrizeTrend { .. } => NotificationType::PrizeTrend,
            NotificationMetadata::Inactivity { .. } => NotificationType::Inactivity,
            NotificationMetadata::Milestone { .. } => NotificationType::Milestone,
        }
    }

    pub fn priority(&self) -> NotificationPriority {
        match self {
            NotificationMetadata::HotLead { .. } => NotificationPriority::High,
            NotificationMetadata::PrizeTrend { .. } => NotificationPriority::Medium,
            NotificationMetadata::Inactivity { .. } => NotificationPriority::High,
            NotificationMetadata::Milestone { .. } => NotificationPriority::Low,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationMetadata::HotLead { .. } => "🔥 Lead Quente Detectado!",
            NotificationMetadata::PrizeTrend { .. } => "📊 Prêmio em Alta",
            NotificationMetadata::Inactivity { .. } => "⚠️ Inatividade Detectada",
            NotificationMetadata::Milestone { .. } => "🎉 Marco Alcançado!",
        }
    }

    pub fn message(&self) -> String {
        match self {
            NotificationMetadata::HotLead { lead_name, .. } => {
                format!("{lead_name} completou todos os dados. Pronto para conversão!")
            }
            NotificationMetadata::PrizeTrend { prize, count } => {
                format!("\"{prize}\" foi ganho {count} vezes. Considere ajustar as chances.")
            }
            NotificationMetadata::Inactivity { days, .. } => {
                format!("Sem novos leads há {days} dias. Verifique a roleta.")
            }
            NotificationMetadata::Milestone { milestone } => {
                format!("Parabéns! Você atingiu {milestone} leads!")
            }
        }
    }

    /// 唯一键：同一事件只通知一次
    pub fn dedup_key(&self, restaurant_id: i64) -> String {
        match self {
            NotificationMetadata::HotLead { lead_id, .. } => {
                format!("hot_lead:{restaurant_id}:{lead_id}")
            }
            NotificationMetadata::PrizeTrend { prize, .. } => {
                format!("prize_trend:{restaurant_id}:{prize}")
            }
            NotificationMetadata::Inactivity { last_lead_at, .. } => {
                format!("inactivity:{restaurant_id}:{}", last_lead_at.format("%Y-%m-%d"))
            }
            NotificationMetadata::Milestone { milestone } => {
                format!("milestone:{restaurant_id}:{milestone}")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub restaurant_id: i64,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    pub read: bool,
    pub metadata: Option<NotificationMetadata>,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(m: notifications::Model) -> Self {
        let metadata = match serde_json::from_str(&m.metadata) {
            Ok(meta) => Some(meta),
            Err(e) => {
                log::warn!("Unreadable metadata on notification {}: {e}", m.id);
                None
            }
        };
        NotificationResponse {
            id: m.id,
            restaurant_id: m.restaurant_id,
            notification_type: m.notification_type,
            title: m.title,
            message: m.message,
            priority: m.priority,
            read: m.read,
            metadata,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct NotificationQuery {
    pub unread_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EvaluationResponse {
    /// 新创建的通知数量
    pub created: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_tagged_json() {
        let meta = NotificationMetadata::Milestone { milestone: 50 };
        let raw = serde_json::to_string(&meta).unwrap();
        assert_eq!(raw, r#"{"type":"milestone","milestone":50}"#);
        let back: NotificationMetadata = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn test_dedup_keys_scope_by_restaurant() {
        let meta = NotificationMetadata::HotLead {
            lead_id: 7,
            lead_name: "Maria".into(),
            lead_phone: "11999999999".into(),
        };
        assert_eq!(meta.dedup_key(3), "hot_lead:3:7");
        assert_ne!(meta.dedup_key(3), meta.dedup_key(4));
        assert_eq!(meta.notification_type(), NotificationType::HotLead);
        assert_eq!(meta.priority(), NotificationPriority::High);
        assert!(meta.message().starts_with("Maria completou"));
    }
}
