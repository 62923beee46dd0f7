pub mod controller;
pub mod state;
pub mod stepper;

pub use controller::{TimerController, TimerEvent, TimerSnapshot};
pub use state::{FinalizeReason, TimerPhase, TimerState};
pub use stepper::{HoldStepper, StepDirection};
