pub mod level;
pub mod owner;
pub mod user;

pub use level::LevelCommands;
pub use owner::OwnerCommands;
pub use user::UserCommands;
