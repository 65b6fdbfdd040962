pub mod check;
pub mod dispatch;
pub mod level;
pub mod owner;
pub mod user;
pub mod whoami;
