//! Common test utilities: scripted HTTP client, manual clock, env isolation

#![allow(dead_code)]

use scanhealth::core::network::{ClockTrait, FetchError, HttpClientTrait, HttpResponse};
use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE_URL: &str = "https://project.supabase.co/functions/v1/make-server";
pub const PING_URL: &str = "https://project.supabase.co/functions/v1/make-server/ping";
pub const HEALTH_URL: &str = "https://project.supabase.co/functions/v1/make-server/health";
pub const STATS_URL: &str = "https://project.supabase.co/functions/v1/make-server/admin/stats";
pub const FALLBACK_STATS_URL: &str = "https://project.supabase.co/functions/v1/make-server/stats";
pub const ANON_KEY: &str = "anon-test-key";

/// One scripted reply for a URL
#[derive(Clone)]
pub enum Scripted {
    Respond {
        status: u16,
        status_text: &'static str,
        body: String,
        delay_ms: u64,
    },
    Fail(FetchError),
    /// Never settles; only the caller's timeout ends it
    Hang,
}

impl Scripted {
    pub fn ok(body: &str) -> Self {
        Scripted::Respond {
            status: 200,
            status_text: "OK",
            body: body.to_string(),
            delay_ms: 0,
        }
    }

    pub fn ok_after(body: &str, delay_ms: u64) -> Self {
        Scripted::Respond {
            status: 200,
            status_text: "OK",
            body: body.to_string(),
            delay_ms,
        }
    }

    pub fn status(status: u16, status_text: &'static str) -> Self {
        Scripted::Respond {
            status,
            status_text,
            body: String::new(),
            delay_ms: 0,
        }
    }

    pub fn network_error() -> Self {
        Scripted::Fail(FetchError::Network("Failed to fetch".to_string()))
    }
}

/// HTTP client returning scripted replies per URL
///
/// Each URL has a queue; the last entry repeats once the queue is drained.
/// Unscripted URLs fail with a network error.
#[derive(Default)]
pub struct ScriptedHttpClient {
    scripts: Mutex<HashMap<String, Vec<Scripted>>>,
    calls: Mutex<Vec<(String, HashMap<String, String>)>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, url: &str, replies: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), replies);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls().iter().filter(|u| u.as_str() == url).count()
    }

    pub fn last_headers(&self) -> Option<HashMap<String, String>> {
        self.calls.lock().unwrap().last().map(|(_, h)| h.clone())
    }

    fn next_reply(&self, url: &str) -> Option<Scripted> {
        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts.get_mut(url)?;
        if queue.len() > 1 {
            Some(queue.remove(0))
        } else {
            queue.first().cloned()
        }
    }
}

#[async_trait::async_trait]
impl HttpClientTrait for ScriptedHttpClient {
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
        _timeout_ms: u32,
    ) -> Result<HttpResponse, FetchError> {
        self.calls.lock().unwrap().push((url.clone(), headers));

        match self.next_reply(&url) {
            Some(Scripted::Respond {
                status,
                status_text,
                body,
                delay_ms,
            }) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(HttpResponse {
                    status,
                    status_text: status_text.to_string(),
                    body: body.into_bytes(),
                    duration: Duration::from_millis(delay_ms),
                })
            }
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(FetchError::Network("URL not scripted".to_string())),
        }
    }
}

/// Clock whose epoch time only moves when told to
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: i64) {
        self.now_ms.store(ms, Ordering::SeqCst);
    }
}

impl ClockTrait for ManualClock {
    fn epoch_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn local_timestamp(&self) -> String {
        "2026-10-16T10:30:00+00:00".to_string()
    }
}

/// Saves and clears the scanhealth environment variables, restoring them on drop
pub struct IsolatedEnv {
    saved: Vec<(&'static str, Option<String>)>,
}

impl IsolatedEnv {
    const VARS: [&'static str; 4] = [
        "SCANHEALTH_BASE_URL",
        "SCANHEALTH_ANON_KEY",
        "SCANHEALTH_TIMEOUT_MS",
        "SCANHEALTH_DEBUG",
    ];

    pub fn new() -> Self {
        let saved = Self::VARS
            .iter()
            .map(|name| (*name, env::var(name).ok()))
            .collect();
        for name in Self::VARS {
            env::remove_var(name);
        }
        Self { saved }
    }

    pub fn set(&self, name: &str, value: &str) {
        env::set_var(name, value);
    }
}

impl Drop for IsolatedEnv {
    fn drop(&mut self) {
        for (name, value) in &self.saved {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }
    }
}
