//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{LiveClock, LiveHttpTransport};
use crate::adapters::recording::{RecordingClock, RecordingHttpTransport};
use crate::adapters::replaying::{ReplayingClock, ReplayingHttpTransport};
use crate::cassette::config::CassetteConfig;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::AppConfig;
use crate::http::HttpRequest;
use crate::ports::clock::Clock;
use crate::ports::http::{HttpFuture, HttpTransport};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying). Ports are shared, so services and the query
/// cache hold clones of the same handles.
#[derive(Clone)]
pub struct ServiceContext {
    /// Clock for cache staleness.
    pub clock: Arc<dyn Clock>,
    /// Transport to the task backend.
    pub http: Arc<dyn HttpTransport>,
}

impl ServiceContext {
    /// Builds a context from explicit port implementations.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, http: Arc<dyn HttpTransport>) -> Self {
        Self { clock, http }
    }

    /// Creates a live context talking to the configured backend.
    #[must_use]
    pub fn live(config: &AppConfig) -> Self {
        Self::new(Arc::new(LiveClock), Arc::new(LiveHttpTransport::new(config.base_url.clone())))
    }

    /// Creates a live context whose port traffic is recorded below `root`.
    ///
    /// The session must be finished after the context (and every service
    /// built from it) has been dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette directory cannot be created.
    pub fn recording_at(root: &Path, config: &AppConfig) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(root, &config.base_url)?;
        let ctx = Self::new(
            Arc::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&session.clock))),
            Arc::new(RecordingHttpTransport::new(
                Box::new(LiveHttpTransport::new(config.base_url.clone())),
                Arc::clone(&session.http),
            )),
        );
        Ok((ctx, session))
    }

    /// Creates a replaying context from a single cassette file.
    ///
    /// Each port gets its own replayer so per-port cursors are independent.
    /// Cassettes without clock traffic fall back to the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        let clock_replayer = CassetteReplayer::new(&cassette);
        let clock: Arc<dyn Clock> = if clock_replayer.has_port("clock") {
            Arc::new(ReplayingClock::new(clock_replayer))
        } else {
            Arc::new(LiveClock)
        };
        Ok(Self::new(clock, Arc::new(ReplayingHttpTransport::new(CassetteReplayer::new(&cassette)))))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a configured cassette panic with a clear message when used.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, String> {
        let replayers = config.load_all()?;
        let clock: Arc<dyn Clock> = match replayers.clock {
            Some(r) => Arc::new(ReplayingClock::new(r)),
            None => Arc::new(PanickingClock),
        };
        let http: Arc<dyn HttpTransport> = match replayers.http {
            Some(r) => Arc::new(ReplayingHttpTransport::new(r)),
            None => Arc::new(PanickingHttpTransport),
        };
        Ok(Self::new(clock, http))
    }
}

// --- Panicking adapters for unspecified ports ---

struct PanickingClock;
impl Clock for PanickingClock {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        panic!("Clock port not configured in CassetteConfig, no cassette loaded for clock");
    }
}

struct PanickingHttpTransport;
impl HttpTransport for PanickingHttpTransport {
    fn send(&self, request: HttpRequest) -> HttpFuture<'_> {
        panic!(
            "HttpTransport port not configured in CassetteConfig, no cassette loaded for {:?} {}",
            request.method, request.path
        );
    }
}
