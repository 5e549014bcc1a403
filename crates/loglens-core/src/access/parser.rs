use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// nginx `ui_short` log format. Only the request url and the trailing
    /// request time are captured, every other field just has to be present.
    static ref LINE_PATTERN: Regex = Regex::new(concat!(
        r"^\S+ ",                             // remote_addr
        r"\S+  ",                             // remote_user
        r"\S+ ",                              // http_x_real_ip
        r"\[\S+ \S+\] ",                      // time_local
        r#""\S+ (?P<url>\S+) \S+" "#,         // request
        r"\S+ ",                              // status
        r"\S+ ",                              // body_bytes_sent
        r#""\S+" "#,                          // http_referer
        r#"".*" "#,                           // http_user_agent
        r#""\S+" "#,                          // http_x_forwarded_for
        r#""\S+" "#,                          // http_X_REQUEST_ID
        r#""\S+" "#,                          // http_X_RB_USER
        r"(?P<request_time>\d+\.\d+)$",       // request_time
    ))
    .unwrap();
}

/// A single (url, request time) pair extracted from one log line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub path: &'a str,
    pub duration: f64,
}

/// Extract the request url and request time from an access log line.
///
/// Returns `None` for anything that does not match the log format, including
/// a request time that does not parse as a finite number. A trailing line
/// terminator is ignored.
pub fn parse_line(line: &str) -> Option<Sample<'_>> {
    let line = line.trim_end_matches(['\n', '\r']);
    let caps = LINE_PATTERN.captures(line)?;

    let path = caps.name("url")?.as_str();
    let duration: f64 = caps.name("request_time")?.as_str().parse().ok()?;
    if !duration.is_finite() {
        return None;
    }

    Some(Sample { path, duration })
}
