use async_trait::async_trait;
use model::DryRunRequest;
use runner::{BatchValidator, DryRunner};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tempfile::TempDir;
use warehouse::{PlanSummary, PlannerError, QueryPlanner};

/// A disposable dbt project on disk: a descriptor plus any number of
/// compiled trees. Dropped with the test.
pub struct FixtureProject {
    root: TempDir,
    name: String,
}

impl FixtureProject {
    pub fn new(name: &str) -> Self {
        let root = tempfile::tempdir().expect("create fixture dir");
        fs::write(
            root.path().join("dbt_project.yml"),
            format!("name: {name}\nversion: '1.0'\nprofile: {name}\n"),
        )
        .expect("write project descriptor");
        Self {
            root,
            name: name.to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    /// Writes one compiled model under `target/<sub>/compiled/<name>/models`.
    /// An empty `sub` writes into the default target tree.
    pub fn compiled_model(&self, sub: &str, rel: &str, sql: &str) -> PathBuf {
        let path = self.models_dir(sub).join(rel);
        fs::create_dir_all(path.parent().expect("model parent")).expect("create model dir");
        fs::write(&path, sql).expect("write model");
        path
    }

    /// Creates the compiled tree for a target without putting any model in it.
    pub fn empty_tree(&self, sub: &str) {
        fs::create_dir_all(self.models_dir(sub)).expect("create empty tree");
    }

    fn models_dir(&self, sub: &str) -> PathBuf {
        let mut dir = self.root.path().join("target");
        if !sub.is_empty() {
            dir = dir.join(sub);
        }
        dir.join("compiled").join(&self.name).join("models")
    }
}

/// What the scripted planner answers for one identity.
#[derive(Debug, Clone)]
pub enum Answer {
    Valid(Option<u64>),
    Rejected {
        message: String,
        reason: Option<String>,
    },
    Unauthorized,
    ServerError,
}

/// Canned rejection with the reason BigQuery reports for bad SQL.
pub fn rejected(message: &str) -> Answer {
    Answer::Rejected {
        message: message.to_string(),
        reason: Some("invalidQuery".to_string()),
    }
}

/// In-memory planner: deterministic answers, call counting, and a record of
/// every identity it was asked about.
pub struct ScriptedPlanner {
    answers: HashMap<String, Answer>,
    fallback: Answer,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedPlanner {
    /// Accepts every model it has no specific answer for.
    pub fn accepting() -> Self {
        Self::with_fallback(Answer::Valid(Some(0)))
    }

    pub fn with_fallback(fallback: Answer) -> Self {
        Self {
            answers: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(mut self, identity: &str, answer: Answer) -> Self {
        self.answers.insert(identity.to_string(), answer);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identities asked about so far, sorted for stable assertions.
    pub fn seen(&self) -> Vec<String> {
        let mut seen = self.seen.lock().expect("seen lock").clone();
        seen.sort();
        seen
    }
}

#[async_trait]
impl QueryPlanner for ScriptedPlanner {
    async fn dry_run(&self, request: &DryRunRequest) -> Result<PlanSummary, PlannerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push(request.identity().to_string());

        match self
            .answers
            .get(request.identity())
            .unwrap_or(&self.fallback)
        {
            Answer::Valid(bytes) => Ok(PlanSummary {
                total_bytes_processed: *bytes,
            }),
            Answer::Rejected { message, reason } => Err(PlannerError::Rejected {
                message: message.clone(),
                reason: reason.clone(),
            }),
            Answer::Unauthorized => Err(PlannerError::Unauthorized {
                status: 401,
                message: "Invalid Credentials".to_string(),
            }),
            Answer::ServerError => Err(PlannerError::Service {
                status: 503,
                body: "backendError".to_string(),
            }),
        }
    }
}

/// The common fixture: a runner over the given planner with a small fixed
/// pool so scenarios behave the same on any machine.
pub fn runner_for(fixture: &FixtureProject, planner: Arc<ScriptedPlanner>) -> DryRunner {
    DryRunner::new(
        fixture.dir(),
        BatchValidator::new(planner).with_concurrency(4),
    )
    .expect("construct runner")
}
