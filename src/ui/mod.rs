pub mod follower;
#[cfg(feature = "ui")]
pub mod app;

pub use follower::ToolHeadFollower;
#[cfg(feature = "ui")]
pub use app::AppUI;
