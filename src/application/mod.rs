pub mod commands;
pub mod notifier;
pub mod time;
pub mod transport;
pub mod view;
