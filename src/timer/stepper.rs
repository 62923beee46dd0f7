use tokio::task::JoinHandle;

/// Direction of a duration adjustment gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

impl StepDirection {
    pub fn unit(self) -> i64 {
        match self {
            StepDirection::Up => 1,
            StepDirection::Down => -1,
        }
    }
}

/// Owner of the hold-to-repeat task for duration stepping.
///
/// At most one repeat task exists per gesture: arming while a task is live
/// replaces it, and releasing (or dropping, e.g. on screen unmount) aborts
/// it so no step fires after the gesture ends.
#[derive(Debug, Default)]
pub struct HoldStepper {
    handle: Option<JoinHandle<()>>,
}

impl HoldStepper {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn arm(&mut self, handle: JoinHandle<()>) {
        self.release();
        self.handle = Some(handle);
    }

    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for HoldStepper {
    fn drop(&mut self) {
        self.release();
    }
}
