pub mod error;
pub mod estimate;
pub mod event;
pub mod format;
pub mod port;
pub mod status;
pub mod threshold;

pub use error::{BattError, Result};
pub use estimate::{Direction, Estimator};
pub use event::Message;
pub use port::{
    CommandRunner, Notice, NoticeKey, Notifier, Renderer, TelemetrySource, Timeout, TrayView,
    Urgency,
};
pub use status::{classify, Levels, Status, SupplyState, Telemetry};
pub use threshold::{Crossing, Level, ThresholdEvent, ThresholdFlags, ThresholdState, ThresholdTracker};
