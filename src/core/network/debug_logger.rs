use std::collections::HashMap;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

use chrono::Local;
use flate2::{write::GzEncoder, Compression};
use fs2::FileExt;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Hardcoded rotation policy
const LOG_ROTATION_SIZE_MB: u64 = 8;
const MAX_ARCHIVES: u32 = 5;
const ROTATION_CHECK_INTERVAL: u32 = 200;

pub const DEBUG_ENV_VAR: &str = "SCANHEALTH_DEBUG";
pub const DEBUG_LOG_PATH_ENV_VAR: &str = "SCANHEALTH_DEBUG_LOG";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,                              // ISO-8601 with timezone
    pub level: String,                                  // DEBUG, WARN, ERROR, PERF, NETWORK
    pub component: String,
    pub event: String,
    pub message: String,                                // Redacted
    pub correlation_id: Option<String>,
    pub fields: HashMap<String, serde_json::Value>,
}

struct RotatingLogger {
    log_path: PathBuf,
    write_count: AtomicU32,
}

impl RotatingLogger {
    fn new(log_path: PathBuf) -> Self {
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        Self {
            log_path,
            write_count: AtomicU32::new(0),
        }
    }

    fn write_with_rotation(&self, json_line: &str) -> Result<(), std::io::Error> {
        if self.write_count.fetch_add(1, Ordering::Relaxed) % ROTATION_CHECK_INTERVAL == 0 {
            let _ = self.rotate_if_needed(); // Don't let rotation errors stop logging
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(file, "{}", json_line)?;
        Ok(())
    }

    fn rotate_if_needed(&self) -> Result<(), std::io::Error> {
        if !self.needs_rotation()? {
            return Ok(());
        }

        // Lock file keeps concurrent processes from rotating twice
        let lock_path = self.log_path.with_extension("lock");
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => {
                if self.needs_rotation()? {
                    self.perform_rotation()?;
                }
                let _ = std::fs::remove_file(&lock_path);
                Ok(())
            }
            Err(_) => Ok(()), // Another process is rotating
        }
    }

    fn needs_rotation(&self) -> Result<bool, std::io::Error> {
        if !self.log_path.exists() {
            return Ok(false);
        }

        let metadata = std::fs::metadata(&self.log_path)?;
        Ok(metadata.len() >= LOG_ROTATION_SIZE_MB * 1024 * 1024)
    }

    fn log_dir_and_stem(&self) -> Result<(&Path, String), std::io::Error> {
        let invalid = || std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid log path");
        let dir = self.log_path.parent().ok_or_else(invalid)?;
        let stem = self
            .log_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(invalid)?
            .to_string();
        Ok((dir, stem))
    }

    fn perform_rotation(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let archive_path = log_dir.join(format!("{}.{}.gz", base_name, timestamp));

        // Move current log aside, compress, then drop the temp copy
        let temp_path = self.log_path.with_extension("rotating");
        std::fs::rename(&self.log_path, &temp_path)?;

        let source_file = File::open(&temp_path)?;
        let target_file = File::create(&archive_path)?;
        let mut encoder = GzEncoder::new(target_file, Compression::default());
        std::io::copy(&mut BufReader::new(source_file), &mut encoder)?;
        encoder.finish()?;

        std::fs::remove_file(&temp_path)?;

        let _ = self.cleanup_old_archives();

        Ok(())
    }

    fn cleanup_old_archives(&self) -> Result<(), std::io::Error> {
        let (log_dir, base_name) = self.log_dir_and_stem()?;
        let prefix = format!("{}.", base_name);

        let mut archives = Vec::new();
        for entry in std::fs::read_dir(log_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            if name.starts_with(&prefix) && name.ends_with(".gz") {
                archives.push((entry.path(), entry.metadata()?.modified()?));
            }
        }

        archives.sort_by_key(|(_, modified)| *modified);
        if archives.len() > MAX_ARCHIVES as usize {
            let to_remove = archives.len() - MAX_ARCHIVES as usize;
            for (path, _) in archives.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }
}

/// JSON Lines debug logger with redaction and size-based rotation
pub struct EnhancedDebugLogger {
    enabled: bool,
    rotating_logger: Option<Mutex<RotatingLogger>>,
    session_id: String,
    redaction_patterns: Vec<Regex>,
}

impl EnhancedDebugLogger {
    /// Logger configured from `SCANHEALTH_DEBUG` and `SCANHEALTH_DEBUG_LOG`
    pub fn new() -> Self {
        Self::with_log_path(Self::get_log_path(), Self::parse_debug_enabled())
    }

    pub fn with_log_path(log_path: PathBuf, enabled: bool) -> Self {
        let session_id = Uuid::new_v4().to_string()[..8].to_string();

        let rotating_logger = if enabled {
            Some(Mutex::new(RotatingLogger::new(log_path)))
        } else {
            None
        };

        Self {
            enabled,
            rotating_logger,
            session_id,
            redaction_patterns: Self::compile_redaction_patterns(),
        }
    }

    /// Supports: true/false, 1/0, yes/no, on/off (case insensitive)
    pub fn parse_debug_enabled() -> bool {
        env::var(DEBUG_ENV_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(false)
    }

    fn get_log_path() -> PathBuf {
        if let Ok(path) = env::var(DEBUG_LOG_PATH_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        log_path.push(".scanhealth");
        log_path.push("scanhealth-debug.log");
        log_path
    }

    fn compile_redaction_patterns() -> Vec<Regex> {
        let patterns = [
            r"(?i)bearer[:\s]+[^\s\n]+",
            r"(?i)authorization[:\s]+[^\s\n]+",
            r"(?i)apikey[:=\s]+[^\s\n]+",
            r"(?i)anon[_-]?key[:=\s]+[^\s\n]+",
            r"(?i)token[:\s]+[^\s\n]+",
            r"(?i)secret[:\s]+[^\s\n]+",
        ];

        patterns
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    }

    /// Redaction guardrails for sensitive data
    pub fn redact_sensitive_data(&self, text: &str) -> String {
        let mut redacted = text.to_string();

        for regex in &self.redaction_patterns {
            redacted = regex.replace_all(&redacted, "[REDACTED]").to_string();
        }

        // Long unbroken strings are usually JWTs or keys
        if redacted.len() > 100
            && !redacted.contains(' ')
            && redacted
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
        {
            redacted = format!("[REDACTED_LONG_STRING_{}chars]", redacted.len());
        }

        redacted
    }

    fn log_sync(
        &self,
        level: &str,
        component: &str,
        event: &str,
        message: &str,
        correlation_id: Option<String>,
        fields: HashMap<String, serde_json::Value>,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            timestamp: Local::now().to_rfc3339(),
            level: level.to_string(),
            component: component.to_string(),
            event: event.to_string(),
            message: self.redact_sensitive_data(message),
            correlation_id: correlation_id.or_else(|| Some(self.session_id.clone())),
            fields,
        };

        if let Some(logger) = &self.rotating_logger {
            if let Ok(logger) = logger.lock() {
                if let Ok(json_line) = serde_json::to_string(&entry) {
                    let _ = logger.write_with_rotation(&json_line); // Don't crash on logging errors
                }
            }
        }
    }

    pub fn debug_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("DEBUG", component, event, message, None, HashMap::new());
    }

    pub fn warn_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("WARN", component, event, message, None, HashMap::new());
    }

    pub fn error_sync(&self, component: &str, event: &str, message: &str) {
        self.log_sync("ERROR", component, event, message, None, HashMap::new());
    }

    pub fn performance_sync(&self, component: &str, operation: &str, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("duration_ms".to_string(), duration_ms.into());

        self.log_sync("PERF", component, "operation_complete", operation, None, fields);
    }

    // Typed methods for server health events

    pub fn health_probe_start(&self, url: &str, timeout_ms: u64, correlation_id: String) {
        let mut fields = HashMap::new();
        fields.insert("url".to_string(), url.into());
        fields.insert("timeout_ms".to_string(), timeout_ms.into());

        self.log_sync(
            "NETWORK",
            "HealthChecker",
            "probe_start",
            &format!("Probing {}", url),
            Some(correlation_id),
            fields,
        );
    }

    pub fn health_probe_end(
        &self,
        healthy: bool,
        http_status: Option<u16>,
        duration_ms: u64,
        correlation_id: String,
    ) {
        let mut fields = HashMap::new();
        fields.insert("healthy".to_string(), healthy.into());
        fields.insert("duration_ms".to_string(), duration_ms.into());
        if let Some(code) = http_status {
            fields.insert("http_status".to_string(), code.into());
        }

        let status = if healthy { "healthy" } else { "unhealthy" };
        self.log_sync(
            "NETWORK",
            "HealthChecker",
            "probe_end",
            &format!("Probe completed: {} ({}ms)", status, duration_ms),
            Some(correlation_id),
            fields,
        );
    }

    pub fn stats_fetch_summary(&self, shape: &str, total_records: u64, duration_ms: u64) {
        let mut fields = HashMap::new();
        fields.insert("shape".to_string(), shape.into());
        fields.insert("total_records".to_string(), total_records.into());
        fields.insert("duration_ms".to_string(), duration_ms.into());

        self.log_sync(
            "NETWORK",
            "StatsFetcher",
            "stats_parsed",
            &format!("Stats parsed from {} shape ({} records)", shape, total_records),
            None,
            fields,
        );
    }

    pub fn retry_attempt(&self, attempt: u32, max_attempts: u32, delay_ms: u64, error: &str) {
        let mut fields = HashMap::new();
        fields.insert("attempt".to_string(), attempt.into());
        fields.insert("max_attempts".to_string(), max_attempts.into());
        fields.insert("delay_ms".to_string(), delay_ms.into());

        self.log_sync(
            "DEBUG",
            "RetryWrapper",
            "retry_scheduled",
            &format!(
                "Attempt {}/{} failed: {}; retrying in {}ms",
                attempt, max_attempts, error, delay_ms
            ),
            None,
            fields,
        );
    }

    pub fn fallback_engaged(&self, component: &str, reason: &str) {
        let mut fields = HashMap::new();
        fields.insert("reason".to_string(), reason.into());

        self.log_sync(
            "NETWORK",
            component,
            "fallback_engaged",
            &format!("Serving fallback data: {}", reason),
            None,
            fields,
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get_session_id(&self) -> &str {
        &self.session_id
    }
}

impl Default for EnhancedDebugLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a boolean-ish flag: true/1/yes/on enable, everything else disables
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

static DEBUG_LOGGER: OnceLock<EnhancedDebugLogger> = OnceLock::new();

/// Initialize the process-wide logger, forcing it on when `force_enabled` is set
///
/// Has no effect once the logger has been created.
pub fn init_debug_logger(force_enabled: bool) -> &'static EnhancedDebugLogger {
    DEBUG_LOGGER.get_or_init(|| {
        if force_enabled {
            EnhancedDebugLogger::with_log_path(EnhancedDebugLogger::get_log_path(), true)
        } else {
            EnhancedDebugLogger::new()
        }
    })
}

/// Process-wide logger, configured from the environment on first use
pub fn get_debug_logger() -> &'static EnhancedDebugLogger {
    DEBUG_LOGGER.get_or_init(EnhancedDebugLogger::new)
}
