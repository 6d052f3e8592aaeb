use serde::{Deserialize, Serialize};

/// Connection metadata safe to log or print in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedConnection {
    pub host: Option<String>,
    pub database: Option<String>,
    pub redacted: String,
}

/// Redact the password portion of a connection URL while keeping the
/// host and database name available for banners and logs.
pub fn redact_connection_string(conn: &str) -> RedactedConnection {
    let Some(scheme_end) = conn.find("://") else {
        return RedactedConnection {
            host: None,
            database: None,
            redacted: conn.to_string(),
        };
    };

    let rest = &conn[scheme_end + 3..];
    // Split on the last @ before the path: an un-encoded password may
    // itself contain @.
    let boundary = rest.find(['/', '?']).unwrap_or(rest.len());
    let (authority, host_and_path) = match rest[..boundary].rfind('@') {
        Some(at) => (Some(&rest[..at]), &rest[at + 1..]),
        None => (None, rest),
    };

    let host_part = host_and_path.split(['/', '?']).next().unwrap_or("");
    let host = host_part
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(host_part);
    let host = (!host.is_empty()).then(|| host.to_string());

    let database = host_and_path
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or(""))
        .filter(|db| !db.is_empty())
        .map(str::to_string);

    let mut redacted = conn.to_string();
    if let Some(authority) = authority {
        if let Some(colon) = authority.find(':') {
            let start = scheme_end + 3 + colon + 1;
            let end = scheme_end + 3 + authority.len();
            redacted.replace_range(start..end, "***");
        }
    }
    redacted = redact_query_secrets(&redacted);

    RedactedConnection {
        host,
        database,
        redacted,
    }
}

fn redact_query_secrets(conn: &str) -> String {
    let Some((base, query)) = conn.split_once('?') else {
        return conn.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=***"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{base}?{}", params.join("&"))
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(key.to_lowercase().as_str(), "password" | "pass" | "sslpassword")
}
