pub mod auth;
pub mod common;
pub mod food_option;
pub mod lead;
pub mod metric;
pub mod notification;
pub mod pagination;
pub mod prize;
pub mod remarketing;
pub mod restaurant;
pub mod wheel;

pub use auth::*;
pub use common::*;
pub use food_option::*;
pub use lead::*;
pub use metric::*;
pub use notification::*;
pub use pagination::*;
pub use prize::*;
pub use remarketing::*;
pub use restaurant::*;
pub use wheel::*;
