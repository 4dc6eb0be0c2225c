pub mod ai_text;
pub mod coupon_webhook;

pub use ai_text::*;
pub use coupon_webhook::*;
