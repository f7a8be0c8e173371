/// Capture lifecycle state.
///
/// State transitions:
/// ```text
/// unconfigured ──init──→ idle ──start──→ running
///                          ↑                │
///                          └──────stop──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    Unconfigured,
    Idle,
    Running,
}

impl CaptureState {
    pub fn is_configured(&self) -> bool {
        !matches!(self, Self::Unconfigured)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

