//! Configuration module for the classroom services.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

/// Which service this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    /// Student records (xp, badges, completed tasks)
    Student,
    /// Teacher records plus forwarding to the student and badges services
    Teacher,
    /// Read-only task catalog and task images
    Tasks,
    /// Badge catalog
    Badges,
}

impl ServiceKind {
    /// Port used when `PORT` is not set.
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Tasks => 3001,
            ServiceKind::Student => 3002,
            ServiceKind::Teacher => 3003,
            ServiceKind::Badges => 3004,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Student => "student-service",
            ServiceKind::Teacher => "teacher-service",
            ServiceKind::Tasks => "tasks-service",
            ServiceKind::Badges => "badges-service",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A malformed environment variable.
#[derive(Debug)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceKind,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Directory holding the JSON collection files
    pub data_dir: PathBuf,
    /// Directory served under `/images` by the tasks service
    pub images_dir: PathBuf,
    /// Base URL of the student service (teacher-service forwarding)
    pub student_service_url: String,
    /// Base URL of the badges service (teacher-service forwarding)
    pub badges_service_url: String,
    /// Timeout for forwarded calls; `None` waits indefinitely
    pub proxy_timeout: Option<Duration>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env(service: ServiceKind) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host: IpAddr = parse_var("BIND_HOST", "127.0.0.1")?;
        let default_port = service.default_port().to_string();
        let port: u16 = parse_var("PORT", &default_port)?;

        let data_dir = env::var("DATA_DIR")
            .unwrap_or_else(|_| "./data".to_string())
            .into();

        let images_dir = env::var("IMAGES_DIR")
            .unwrap_or_else(|_| "./public/images".to_string())
            .into();

        let student_service_url =
            env::var("STUDENT_SERVICE").unwrap_or_else(|_| "http://localhost:3002".to_string());
        let badges_service_url =
            env::var("BADGES_SERVICE").unwrap_or_else(|_| "http://localhost:3004".to_string());

        let timeout_secs: u64 = parse_var("PROXY_TIMEOUT_SECS", "30")?;
        let proxy_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            service,
            bind_addr: SocketAddr::new(host, port),
            data_dir,
            images_dir,
            student_service_url,
            badges_service_url,
            proxy_timeout,
            log_level,
        })
    }

    pub fn students_file(&self) -> PathBuf {
        self.data_dir.join("students.json")
    }

    pub fn teachers_file(&self) -> PathBuf {
        self.data_dir.join("teachers.json")
    }

    pub fn badges_file(&self) -> PathBuf {
        self.data_dir.join("badges.json")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }
}

fn parse_var<T>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        message: format!("{:?}: {}", raw, e),
    })
}
