//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`, `skip_notice`.
//! Role: Shared contract helper for CLI diagnostics (non-error events).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub file: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    json!({
        "notice": {
            "kind": notice.kind,
            "time": notice.time,
            "cmd": notice.cmd,
            "file": notice.file,
            "message": notice.message,
            "details": Value::Object(notice.details.clone()),
        }
    })
}

/// Reports removed positions that a resilient page walked past.
pub fn skip_notice(time: String, cmd: &str, file: &str, skipped: &[usize]) -> Notice {
    let mut details = Map::new();
    details.insert("skipped_count".to_string(), json!(skipped.len()));
    details.insert("positions".to_string(), json!(skipped));
    let noun = if skipped.len() == 1 { "position" } else { "positions" };
    Notice {
        kind: "skip".to_string(),
        time,
        cmd: cmd.to_string(),
        file: file.to_string(),
        message: format!("skipped {} removed {noun}", skipped.len()),
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::{notice_json, skip_notice};

    #[test]
    fn notice_json_has_required_fields() {
        let notice = skip_notice(
            "2026-02-01T00:00:00Z".to_string(),
            "index",
            "names.csv",
            &[4, 5, 9],
        );

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(obj.get("kind").and_then(|v| v.as_str()), Some("skip"));
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-02-01T00:00:00Z")
        );
        assert_eq!(obj.get("cmd").and_then(|v| v.as_str()), Some("index"));
        assert_eq!(obj.get("file").and_then(|v| v.as_str()), Some("names.csv"));
        assert_eq!(
            obj.get("message").and_then(|v| v.as_str()),
            Some("skipped 3 removed positions")
        );
        let details = obj.get("details").and_then(|v| v.as_object()).expect("details");
        assert_eq!(details["skipped_count"], 3);
        assert_eq!(details["positions"][2], 9);
    }

    #[test]
    fn single_skip_uses_singular() {
        let notice = skip_notice(String::new(), "scan", "f.csv", &[1]);
        assert_eq!(notice.message, "skipped 1 removed position");
    }
}
