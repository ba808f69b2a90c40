//! Async load driver.
//!
//! A controller ticks every [`TICK`], asks the scenario how many virtual
//! users should be active and spawns the missing ones. Each VU loops over
//! the scenario steps until the target drops to or below its id.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::fixtures::SeedArticle;
use crate::scenario::{Scenario, Step};
use crate::stats::Sample;

/// Controller resolution.
pub const TICK: Duration = Duration::from_millis(250);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("setup failed: {0}")]
    Setup(String),

    #[error("virtual user task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Account the authenticated scenarios run as.
#[derive(Debug, Clone, Copy)]
pub struct PerfUser {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const PERF_USER: PerfUser = PerfUser {
    username: "perftest1",
    email: "perf-test1@example.com",
    password: "PerfTest1234!",
};

pub struct Runner {
    client: Client,
    api_root: String,
}

impl Runner {
    /// `base_url` is the API root, e.g. `http://localhost:8081/api`.
    pub fn new(base_url: &str) -> Result<Self, RunnerError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_root: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    /// Log the perf user in, registering it first when login is refused.
    pub async fn setup(&self, user: &PerfUser) -> Result<String, RunnerError> {
        if let Some(token) = self.login(user).await? {
            return Ok(token);
        }
        tracing::info!(email = user.email, "perf user not found, registering");
        self.register(user).await
    }

    async fn login(&self, user: &PerfUser) -> Result<Option<String>, RunnerError> {
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(&json!({"user": {"email": user.email, "password": user.password}}))
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "perf user login refused");
            return Ok(None);
        }
        let body: Value = response.json().await?;
        token_from(&body).map(Some)
    }

    async fn register(&self, user: &PerfUser) -> Result<String, RunnerError> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(&json!({"user": {
                "username": user.username,
                "email": user.email,
                "password": user.password,
            }}))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(RunnerError::Setup(format!(
                "registration returned {status}: {text}"
            )));
        }
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| RunnerError::Setup(format!("unreadable registration response: {e}")))?;
        token_from(&body)
    }

    /// Create the given articles as the token's user. Returns how many
    /// were accepted.
    pub async fn seed(&self, token: &str, articles: &[SeedArticle]) -> Result<usize, RunnerError> {
        let mut created = 0;
        for article in articles {
            let response = self
                .client
                .post(self.url("/articles"))
                .header(AUTHORIZATION, format!("Token {token}"))
                .json(&json!({"article": {
                    "title": article.title,
                    "description": article.description,
                    "body": article.body,
                    "tagList": article.tags,
                }}))
                .send()
                .await?;
            if response.status().is_success() {
                created += 1;
            } else {
                tracing::warn!(title = %article.title, status = %response.status(), "seed article rejected");
            }
        }
        Ok(created)
    }

    /// Play `scenario` to completion and return every recorded sample.
    pub async fn run(
        &self,
        scenario: &Scenario,
        token: Option<String>,
    ) -> Result<Vec<Sample>, RunnerError> {
        let steps: Arc<[(String, Duration)]> = scenario
            .steps
            .iter()
            .map(|step: &Step| (self.url(step.path), step.pause))
            .collect();
        let token: Option<Arc<str>> = token.map(Into::into);

        let (target_tx, _) = watch::channel(0u32);
        let mut vus: Vec<Option<JoinHandle<Vec<Sample>>>> = Vec::new();
        let mut samples = Vec::new();

        let total = scenario.total_duration();
        let started = Instant::now();
        let mut ticker = tokio::time::interval(TICK);
        tracing::info!(scenario = scenario.name, total_secs = total.as_secs(), "run started");

        loop {
            ticker.tick().await;
            let elapsed = started.elapsed();
            if elapsed >= total {
                break;
            }

            let target = scenario.target_at(elapsed);
            target_tx.send_replace(target);

            for id in 0..target {
                let slot = id as usize;
                if vus.len() <= slot {
                    vus.resize_with(slot + 1, || None);
                }
                if vus[slot].as_ref().is_some_and(|h| !h.is_finished()) {
                    continue;
                }
                if let Some(done) = vus[slot].take() {
                    samples.extend(done.await?);
                }
                vus[slot] = Some(tokio::spawn(virtual_user(
                    id,
                    self.client.clone(),
                    Arc::clone(&steps),
                    token.clone(),
                    target_tx.subscribe(),
                )));
            }
        }

        target_tx.send_replace(0);
        for handle in vus.into_iter().flatten() {
            samples.extend(handle.await?);
        }
        tracing::info!(scenario = scenario.name, samples = samples.len(), "run finished");
        Ok(samples)
    }
}

fn token_from(body: &Value) -> Result<String, RunnerError> {
    body["user"]["token"]
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| RunnerError::Setup(format!("response carries no token: {body}")))
}

fn still_wanted(target: &watch::Receiver<u32>, id: u32) -> bool {
    *target.borrow() > id
}

async fn virtual_user(
    id: u32,
    client: Client,
    steps: Arc<[(String, Duration)]>,
    token: Option<Arc<str>>,
    target: watch::Receiver<u32>,
) -> Vec<Sample> {
    let mut samples = Vec::new();
    'iterations: while still_wanted(&target, id) {
        for (url, pause) in steps.iter() {
            samples.push(timed_get(&client, url, token.as_deref()).await);
            if !pause.is_zero() {
                tokio::time::sleep(*pause).await;
            }
            if !still_wanted(&target, id) {
                break 'iterations;
            }
        }
    }
    samples
}

async fn timed_get(client: &Client, url: &str, token: Option<&str>) -> Sample {
    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("Token {token}"));
    }

    let started = Instant::now();
    let ok = match request.send().await {
        Ok(response) => {
            let success = response.status().is_success();
            // Drain the body so latency covers the full response.
            response.bytes().await.is_ok() && success
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "request failed");
            false
        }
    };
    Sample {
        latency: started.elapsed(),
        ok,
    }
}
