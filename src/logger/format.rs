//! Access log line rendering
//!
//! `simple` is the default one-line format:
//! `[YYYY-MM-DD HH:MM:SS] [METHOD] /path STATUS`. The `combined` and
//! `common` names select the usual Apache/Nginx layouts, `json` emits one
//! object per line. Unknown names render as `simple`.

use chrono::{DateTime, Local};

/// Access log layout selected by `logging.access_log_format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Simple,
    Combined,
    Common,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            _ => Self::Simple,
        }
    }
}

/// Everything known about one answered request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Peer IP, `-` when unknown
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// `1.0`, `1.1`, `2`
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped with the current local time; remaining fields are
    /// filled in by the dispatcher once the response is known
    #[must_use]
    pub fn new(method: String, path: String, status: u16) -> Self {
        Self {
            remote_addr: "-".to_string(),
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    #[must_use]
    pub fn format(&self, format: &str) -> String {
        match LogFormat::from_name(format) {
            LogFormat::Simple => self.format_simple(),
            LogFormat::Combined => self.format_combined(),
            LogFormat::Common => self.format_common(),
            LogFormat::Json => self.format_json(),
        }
    }

    fn format_simple(&self) -> String {
        format!(
            "[{}] [{}] {} {}",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.method,
            self.path,
            self.status,
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new("GET".to_string(), "/api/users".to_string(), 200);
        entry.time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        entry.remote_addr = "192.168.1.1".to_string();
        entry.query = Some("page=1".to_string());
        entry.body_bytes = 1234;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_simple() {
        let entry = create_test_entry();
        assert_eq!(
            entry.format("simple"),
            "[2024-03-09 07:05:01] [GET] /api/users 200"
        );
        assert_eq!(entry.format("no-such-format"), entry.format("simple"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("common"), LogFormat::Common);
        assert_eq!(LogFormat::from_name(""), LogFormat::Simple);
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.starts_with("192.168.1.1 - - [09/Mar/2024:07:05:01 "));
        assert!(log.contains("\"GET /api/users?page=1 HTTP/1.1\" 200 1234"));
        assert!(log.ends_with("\"https://example.com\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("GET /api/users?page=1 HTTP/1.1"));
        assert!(log.ends_with("200 1234"));
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["status"], 200);
        assert_eq!(value["query"], "page=1");
        assert_eq!(value["body_bytes"], 1234);
        assert!(value["time"].as_str().unwrap().starts_with("2024-03-09T07:05:01"));
    }
}
