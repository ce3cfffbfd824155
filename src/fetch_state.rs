//! Shared fetch status
//!
//! Written by the native and WASM fetch clients, shown in the header.

/// Outcome of the most recent snapshot request
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ok,
    Error(String),
}

impl FetchStatus {
    pub fn label(&self) -> &str {
        match self {
            FetchStatus::Idle => "Idle",
            FetchStatus::Loading => "Loading...",
            FetchStatus::Ok => "Ok",
            FetchStatus::Error(_) => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FetchStatus::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(FetchStatus::default(), FetchStatus::Idle);
        assert_eq!(FetchStatus::Loading.label(), "Loading...");
        let err = FetchStatus::Error("HTTP 500".into());
        assert!(err.is_error());
        assert_eq!(err.label(), "Error");
    }
}
