/// Typed session state.
///
/// The interactive session owns at most one loaded dataset for its
/// lifetime. This replaces ad-hoc attribute injection with an explicit
/// structure: modules that need the dataset receive the session by
/// reference and get a loud `Input` error when nothing is loaded yet.
/// All derived values (partitions, profiles, flags, readings) are computed
/// fresh from the dataset and owned by the caller, never cached here.

use crate::model::{Dataset, TempError};

#[derive(Debug, Default)]
pub struct SessionState {
    dataset: Option<Dataset>,
}

impl SessionState {
    pub fn new() -> SessionState {
        SessionState::default()
    }

    /// Replace the loaded dataset. A re-upload discards the previous one.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
    }

    /// The loaded dataset, or an `Input` error directing the user to the
    /// upload step.
    pub fn dataset(&self) -> Result<&Dataset, TempError> {
        self.dataset
            .as_ref()
            .ok_or_else(|| TempError::Input("no dataset loaded — upload a CSV first".to_string()))
    }

    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    /// Drop the loaded dataset, returning the session to its initial state.
    pub fn clear(&mut self) {
        self.dataset = None;
    }
}
