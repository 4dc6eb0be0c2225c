pub mod auth_service;
pub mod food_option_service;
pub mod lead_service;
pub mod metrics_service;
pub mod notification_service;
pub mod prize_selection;
pub mod prize_service;
pub mod remarketing_service;
pub mod restaurant_service;
pub mod wheel_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth_service::*;
pub use food_option_service::*;
pub use lead_service::*;
pub use metrics_service::*;
pub use notification_service::*;
pub use prize_selection::*;
pub use prize_service::*;
pub use remarketing_service::*;
pub use restaurant_service::*;
pub use wheel_service::*;
