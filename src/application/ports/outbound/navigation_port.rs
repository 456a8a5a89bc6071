//! Navigation ports - routing and the blocking confirmation dialog

/// In-app router. Only called once any confirmation has resolved.
pub trait Router: Send + Sync {
    fn navigate(&self, path: &str);
    fn back(&self);
}

/// Answer to "you have unsaved changes" when leaving the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Flush every slice, then leave
    SaveAndLeave,
    /// Reset every slice, then leave
    DiscardAndLeave,
    /// Cancel the navigation
    Stay,
}

/// Blocking user prompt; the caller does not continue until it returns.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> NavigationDecision;
}
