//! Desktop-side collaborators of the tray: notifications over D-Bus,
//! command spawning and status output.

pub mod command;
pub mod notify;
pub mod render;

pub use command::ProcessRunner;
pub use notify::{DbusNotifier, NoopNotifier};
pub use render::JsonRenderer;
