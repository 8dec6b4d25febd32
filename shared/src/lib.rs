pub mod animation;
pub mod constants;
pub mod error;
pub mod selection;
pub mod shared_wheel_game;
pub mod tournament;
pub mod triggers;
pub mod validation;
pub mod wheel_config;
