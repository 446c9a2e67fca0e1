use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use anyhow::Context;
use tracing::{debug, info};

use roicalc_core::SessionId;
use roicalc_estimator::{EstimatorConfig, ProductLine};
use roicalc_infra::config::DEFAULT_SESSION_IDLE;
use roicalc_infra::{AppConfig, PostgresStore, ReportingAdapter, StoreBackend};
use roicalc_wizard::{WizardError, WizardState};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("wizard session not found")]
    NotFound,
    #[error(transparent)]
    Wizard(#[from] WizardError),
}

#[derive(Debug)]
struct Session {
    state: WizardState,
    touched: Instant,
}

/// Process-wide state shared by every handler.
///
/// Each wizard session is owned by one visitor; the map is only locked for
/// the duration of a single transition, never across an `.await`. Sessions
/// idle for longer than `session_idle` are swept when a new one starts.
#[derive(Debug)]
pub struct AppServices {
    sessions: Mutex<HashMap<SessionId, Session>>,
    adapter: ReportingAdapter,
    estimator: EstimatorConfig,
    session_idle: Duration,
}

impl AppServices {
    pub fn new(adapter: ReportingAdapter, estimator: EstimatorConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            adapter,
            estimator,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(ReportingAdapter::in_memory(), EstimatorConfig::default())
    }

    pub fn with_session_idle(mut self, session_idle: Duration) -> Self {
        self.session_idle = session_idle;
        self
    }

    pub fn adapter(&self) -> &ReportingAdapter {
        &self.adapter
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create_session(&self, preselect: Option<ProductLine>) -> (SessionId, WizardState) {
        let id = SessionId::new();
        let state = match preselect {
            Some(line) => WizardState::with_preselected(line, self.estimator.clone()),
            None => WizardState::new(self.estimator.clone()),
        };

        let mut sessions = self.sessions();
        let swept = sweep_idle(&mut sessions, self.session_idle, Instant::now());
        if swept > 0 {
            debug!(swept, remaining = sessions.len(), "idle wizard sessions dropped");
        }
        sessions.insert(
            id,
            Session {
                state: state.clone(),
                touched: Instant::now(),
            },
        );
        drop(sessions);

        info!(session_id = %id, preselect = ?preselect, "wizard session started");
        (id, state)
    }

    pub fn session(&self, id: SessionId) -> Result<WizardState, SessionError> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
        session.touched = Instant::now();
        Ok(session.state.clone())
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }

    /// Run one transition against a session and return its outcome together
    /// with the state after it.
    pub fn update<T>(
        &self,
        id: SessionId,
        action: impl FnOnce(&mut WizardState) -> Result<T, WizardError>,
    ) -> Result<(T, WizardState), SessionError> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;
        session.touched = Instant::now();
        let outcome = action(&mut session.state)?;
        Ok((outcome, session.state.clone()))
    }
}

/// Drop sessions last touched more than `idle` before `now`; returns how many.
fn sweep_idle(sessions: &mut HashMap<SessionId, Session>, idle: Duration, now: Instant) -> usize {
    let before = sessions.len();
    sessions.retain(|_, s| now.saturating_duration_since(s.touched) <= idle);
    before - sessions.len()
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let adapter = match config.store {
        StoreBackend::Memory => ReportingAdapter::in_memory(),
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when ROICALC_STORE=postgres")?;
            let store = PostgresStore::connect(url)
                .await
                .context("failed to connect to Postgres")?;
            store.migrate().await.context("failed to create tables")?;
            ReportingAdapter::with_store(Arc::new(store))
        }
    };

    let services = AppServices::new(adapter, EstimatorConfig::default());
    Ok(services.with_session_idle(config.session_idle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_isolated() {
        let services = AppServices::in_memory();
        let (a, _) = services.create_session(Some(ProductLine::Crm));
        let (b, _) = services.create_session(None);

        services.update(b, |w| w.toggle(ProductLine::M365)).unwrap();

        assert_eq!(services.session(a).unwrap().selection(), &[ProductLine::Crm]);
        assert_eq!(services.session(b).unwrap().selection(), &[ProductLine::M365]);
    }

    #[test]
    fn unknown_session() {
        let services = AppServices::in_memory();
        assert!(matches!(services.session(SessionId::new()), Err(SessionError::NotFound)));
        assert!(matches!(
            services.update(SessionId::new(), |w| w.next()),
            Err(SessionError::NotFound)
        ));
    }

    #[test]
    fn idle_sessions_are_swept_on_start() {
        let services = AppServices::in_memory().with_session_idle(Duration::ZERO);
        let (stale, _) = services.create_session(None);
        std::thread::sleep(Duration::from_millis(5));

        let (fresh, _) = services.create_session(None);
        assert!(matches!(services.session(stale), Err(SessionError::NotFound)));
        assert!(services.session(fresh).is_ok());
        assert_eq!(services.session_count(), 1);
    }

    #[test]
    fn active_sessions_survive_the_sweep() {
        let services = AppServices::in_memory();
        let (a, _) = services.create_session(None);
        services.create_session(None);
        assert!(services.session(a).is_ok());
        assert_eq!(services.session_count(), 2);
    }

    #[test]
    fn sweep_uses_last_touch() {
        let base = Instant::now();
        let idle = Duration::from_secs(60);
        let mut sessions = HashMap::new();
        let old = SessionId::new();
        let recent = SessionId::new();
        sessions.insert(
            old,
            Session {
                state: WizardState::default(),
                touched: base,
            },
        );
        sessions.insert(
            recent,
            Session {
                state: WizardState::default(),
                touched: base + Duration::from_secs(2),
            },
        );

        let now = base + Duration::from_secs(61);
        assert_eq!(sweep_idle(&mut sessions, idle, now), 1);
        assert!(sessions.contains_key(&recent));
        assert!(!sessions.contains_key(&old));
    }

    #[test]
    fn failed_transition_is_reported() {
        let services = AppServices::in_memory();
        let (id, _) = services.create_session(None);
        assert!(matches!(
            services.update(id, |w| w.next()),
            Err(SessionError::Wizard(WizardError::Blocked(_)))
        ));
    }
}
