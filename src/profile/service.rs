//! Profile backend interface and its randomized stub.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use thiserror::Error;

use super::model::Profile;
use crate::config::ServiceConfig;

/// Errors returned by the profile service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Произошла ошибка при загрузке данных из сети.")]
    BadNetwork,

    #[error("Request rejected: {reason}")]
    Rejected { reason: String },
}

/// Backend the profile screen talks to.
#[async_trait]
pub trait ProfileService: Send + Sync {
    async fn fetch_profile(&self) -> Result<Profile, ServiceError>;

    async fn update_email(&self, new_email: String) -> Result<(), ServiceError>;
}

/// In-memory service that imitates a slow, flaky backend.
///
/// Every call sleeps for a random delay from the configured range. The very
/// first profile fetch fails with [`ServiceError::BadNetwork`] (unless
/// disabled in config); later fetches return the mocked profile.
pub struct StubProfileService {
    profile: Mutex<Profile>,
    fetches: AtomicU64,
    config: ServiceConfig,
}

impl StubProfileService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            profile: Mutex::new(Self::mocked_profile()),
            fetches: AtomicU64::new(0),
            config,
        }
    }

    pub fn mocked_profile() -> Profile {
        Profile {
            first_name: "Дмитрий".to_string(),
            last_name: "Игнатьев".to_string(),
            middle_name: None,
            login: "iDmitriy".to_string(),
            email: None,
            phone: Some("+7(999)123-45-67".to_string()),
        }
    }

    /// Number of `fetch_profile` calls so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    fn delay(min_ms: u64, max_ms: u64) -> Duration {
        let ms = if min_ms >= max_ms {
            min_ms
        } else {
            rand::thread_rng().gen_range(min_ms..=max_ms)
        };
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl ProfileService for StubProfileService {
    async fn fetch_profile(&self) -> Result<Profile, ServiceError> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        let result = if attempt == 0 && self.config.fail_first_fetch {
            Err(ServiceError::BadNetwork)
        } else {
            Ok(self.profile.lock().clone())
        };

        let delay = Self::delay(self.config.min_latency_ms, self.config.max_latency_ms);
        tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, "stub profile fetch");
        tokio::time::sleep(delay).await;
        result
    }

    async fn update_email(&self, new_email: String) -> Result<(), ServiceError> {
        if new_email.trim().is_empty() {
            return Err(ServiceError::Rejected {
                reason: "e-mail must not be empty".to_string(),
            });
        }
        self.profile.lock().email = Some(new_email);

        let delay = Self::delay(
            self.config.email_update_min_ms,
            self.config.email_update_max_ms,
        );
        tokio::time::sleep(delay).await;
        Ok(())
    }
}
