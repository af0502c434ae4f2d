//! Route handlers

pub mod api;
pub mod form;
pub mod health;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::{AppState, WebConfig};
    use std::io::Write;

    /// Artifact shipped with the repository
    pub const SAMPLE_ARTIFACT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/final_model.json");

    pub fn ready_state() -> AppState {
        let config = WebConfig {
            model_path: SAMPLE_ARTIFACT.into(),
            ..Default::default()
        };
        AppState::load(config)
    }

    pub fn missing_state() -> AppState {
        let dir = tempfile::tempdir().unwrap();
        let config = WebConfig {
            model_path: dir.path().join("absent.json"),
            ..Default::default()
        };
        AppState::load(config)
    }

    pub fn corrupt_state() -> AppState {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        let config = WebConfig {
            model_path: tmp.path().to_path_buf(),
            ..Default::default()
        };
        AppState::load(config)
    }
}
