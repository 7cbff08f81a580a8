//! Shared fixtures for unit tests: cassette-backed transports and a
//! hand-driven clock.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use crate::adapters::recording::RecordingHttpTransport;
use crate::adapters::replaying::ReplayingHttpTransport;
use crate::cassette::format::{Cassette, Interaction};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::context::ServiceContext;
use crate::model::{Developer, Skill, Status, Task};
use crate::ports::Clock;

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Mutex::new(Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Replays the given `http::send` outputs and records the requests made.
pub struct Backend {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl Backend {
    pub fn new(outputs: Vec<Value>) -> Self {
        let interactions = outputs
            .into_iter()
            .enumerate()
            .map(|(seq, output)| Interaction {
                seq: seq as u64,
                port: "http".into(),
                method: "send".into(),
                input: Value::Null,
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "unit".into(),
            recorded_at: Utc::now(),
            base_url: String::new(),
            interactions,
        };
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            std::env::temp_dir().join("taskboard_unit_unused.cassette.yaml"),
            "unit",
            "",
        )));
        let http = RecordingHttpTransport::new(
            Box::new(ReplayingHttpTransport::new(CassetteReplayer::new(&cassette))),
            Arc::clone(&recorder),
        );
        let clock = Arc::new(ManualClock::new());
        let ctx = ServiceContext::new(Arc::clone(&clock) as Arc<dyn Clock>, Arc::new(http));
        Self { ctx, clock, recorder }
    }

    /// Requests sent so far, as recorded JSON.
    pub fn requests(&self) -> Vec<Value> {
        let guard = self.recorder.lock().unwrap();
        guard.interactions().iter().map(|i| i.input.clone()).collect()
    }
}

pub fn ok(data: Value) -> Value {
    json!({"Ok": {"status": 200, "data": data}})
}

pub fn no_content() -> Value {
    json!({"Ok": {"status": 204, "data": null}})
}

pub fn server_error() -> Value {
    json!({"Err": {"kind": "status", "status": 500, "status_text": "Internal Server Error"}})
}

pub fn skill(id: u32, name: &str) -> Skill {
    Skill { skill_id: id, skill_name: name.into() }
}

pub fn status(id: u32, name: &str) -> Status {
    Status { status_id: id, status_name: name.into() }
}

pub fn developer(id: &str, name: &str, skills: Vec<Skill>) -> Developer {
    Developer { developer_id: id.into(), developer_name: name.into(), skills: Some(skills) }
}

pub fn task(id: &str, title: &str) -> Task {
    Task {
        task_id: id.into(),
        title: title.into(),
        skills: Vec::new(),
        status: None,
        developer: None,
        subtasks: None,
    }
}
