//! Pieces shared by the create/edit/delete, transfer and adjustment workflows.
//!
//! A submit borrows its dialog mutably until the request and any reload have
//! finished, so one dialog never has two submissions in flight. Success
//! triggers a store reload; failure writes a message into the store and leaves
//! the dialog open.
//! Nothing is returned as an error: the caller gets an `Outcome` to branch on.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Request accepted and the store was reloaded.
    Succeeded,
    /// Request sent and rejected (or never completed); the error is in the store.
    Failed,
    /// Not dispatched: the form did not pass client-side checks.
    Invalid,
    /// Not dispatched: the user declined the confirmation.
    Cancelled,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// Interactive yes/no question asked before irreversible actions.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Non-empty trimmed text, or `None`.
pub(crate) fn optional_text(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}
