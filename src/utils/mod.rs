pub mod color;
pub mod jwt;
pub mod password;
pub mod phone;
pub mod whatsapp;

pub use color::random_hex_color;
pub use jwt::*;
pub use password::*;
pub use phone::*;
pub use whatsapp::*;
