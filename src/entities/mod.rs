pub mod accounts;
pub mod coupon_deliveries;
pub mod food_options;
pub mod leads;
pub mod metrics;
pub mod notifications;
pub mod prizes;
pub mod restaurants;

pub use accounts as account_entity;
pub use coupon_deliveries as coupon_delivery_entity;
pub use food_options as food_option_entity;
pub use leads as lead_entity;
pub use metrics as metric_entity;
pub use notifications as notification_entity;
pub use prizes as prize_entity;
pub use restaurants as restaurant_entity;

pub use accounts::AccountRole;
pub use coupon_deliveries::DeliveryChannel;
pub use leads::CouponStatus;
pub use notifications::{NotificationPriority, NotificationType};
pub use prizes::{LimitPeriod, PrizeTier};
pub use restaurants::RestaurantStatus;
