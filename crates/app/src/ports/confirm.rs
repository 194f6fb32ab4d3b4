//! Confirmation port — asks the user before a gate actually moves.

use std::future::Future;

/// Driving-side prompt shown before a destructive action.
///
/// Returning `false` aborts the action without touching the device.
pub trait ConfirmationPrompt: Send + Sync {
    /// Ask the user to confirm `message`.
    fn confirm(&self, message: &str) -> impl Future<Output = bool> + Send;
}

/// Prompt that confirms everything, for non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmationPrompt for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> impl Future<Output = bool> + Send {
        async { true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_always_confirm() {
        assert!(AlwaysConfirm.confirm("Are you sure?").await);
    }
}
