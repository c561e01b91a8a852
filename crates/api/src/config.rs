use anyhow::Context;
use sched_core::Limits;
use std::str::FromStr;

const PREFIX: &str = "EXAMSCHED__";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub port: u16,
    pub body_limit_bytes: usize,
    pub jobs_max_retained: usize,
    pub limits: Limits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            body_limit_bytes: 2 * 1024 * 1024,
            jobs_max_retained: jobs::DEFAULT_MAX_RETAINED,
            limits: Limits::default(),
        }
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let name = format!("{PREFIX}{key}");
    match lookup(&name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name}={raw:?} is not valid")),
    }
}

impl Config {
    /// Reads the service configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `EXAMSCHED__SERVER__PORT` (default: 8080)
    /// - `EXAMSCHED__SERVER__BODY_LIMIT_BYTES` (default: 2 MiB)
    /// - `EXAMSCHED__JOBS__MAX_RETAINED` (default: 1000 finished jobs kept)
    /// - `EXAMSCHED__LIMITS__MAX_COURSES`, `_MAX_STUDENTS`, `_MAX_FACULTY`, `_MAX_DAYS`
    ///
    /// # Errors
    /// Returns an error naming the variable when a value does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let d = Config::default();
        Ok(Self {
            port: read(&lookup, "SERVER__PORT", d.port)?,
            body_limit_bytes: read(&lookup, "SERVER__BODY_LIMIT_BYTES", d.body_limit_bytes)?,
            jobs_max_retained: read(&lookup, "JOBS__MAX_RETAINED", d.jobs_max_retained)?,
            limits: Limits {
                max_courses: read(&lookup, "LIMITS__MAX_COURSES", d.limits.max_courses)?,
                max_students: read(&lookup, "LIMITS__MAX_STUDENTS", d.limits.max_students)?,
                max_faculty: read(&lookup, "LIMITS__MAX_FACULTY", d.limits.max_faculty)?,
                max_days: read(&lookup, "LIMITS__MAX_DAYS", d.limits.max_days)?,
            },
        })
    }
}
