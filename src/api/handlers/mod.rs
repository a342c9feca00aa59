pub mod auth;
pub mod health;
pub mod projects;

pub use self::health::{health, root};
pub use self::projects::{fs_data, pc_data};
