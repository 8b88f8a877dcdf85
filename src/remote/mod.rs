use crate::domain::{CardId, StatusId};
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(feature = "http-updater")]
pub mod http;

#[cfg(feature = "http-updater")]
pub use http::HttpStatusUpdater;

/// Result of one attempt to persist a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Persists a card's new status on the server.
///
/// Implementations make exactly one attempt and report every kind of
/// failure (transport, parsing, server rejection) as `Outcome::Failure`.
#[async_trait]
pub trait StatusUpdater: Send + Sync {
    async fn update_status(&self, card: &CardId, status: &StatusId) -> Outcome;
}

#[async_trait]
impl<T> StatusUpdater for Arc<T>
where
    T: StatusUpdater + ?Sized,
{
    async fn update_status(&self, card: &CardId, status: &StatusId) -> Outcome {
        (**self).update_status(card, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Outcome);

    #[async_trait]
    impl StatusUpdater for Fixed {
        async fn update_status(&self, _card: &CardId, _status: &StatusId) -> Outcome {
            self.0
        }
    }

    #[test]
    fn test_outcome_from_bool() {
        assert_eq!(Outcome::from(true), Outcome::Success);
        assert_eq!(Outcome::from(false), Outcome::Failure);
        assert!(Outcome::Success.is_success());
        assert!(!Outcome::Failure.is_success());
    }

    #[tokio::test]
    async fn test_arc_updater_delegates() {
        let updater: Arc<dyn StatusUpdater> = Arc::new(Fixed(Outcome::Failure));
        let outcome = updater
            .update_status(&CardId::from(1), &StatusId::from("Scrap"))
            .await;
        assert_eq!(outcome, Outcome::Failure);
    }
}
