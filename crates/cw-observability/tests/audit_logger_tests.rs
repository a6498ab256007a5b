//! File-level behavior of the audit logger: signing, rotation, forwarding
//! and concurrent appends.

use async_trait::async_trait;
use cw_core::{ActionPlan, ActionResult, AuditEntry, ContainmentResults, Indicators};
use cw_observability::{
    read_records, sign_payload, verify_record, AuditConfig, AuditError, AuditForwarder,
    AuditLogger, AuditRecorder, SIGNATURE_FIELD,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

fn config(path: &Path) -> AuditConfig {
    AuditConfig {
        path: path.to_path_buf(),
        ..AuditConfig::default()
    }
}

fn denied_entry() -> AuditEntry {
    let indicators = Indicators::new()
        .with_url("https://bad.example.com/login")
        .with_email("msg-1");
    let plan = ActionPlan::for_incident("victim@example.com", &indicators);
    AuditEntry::denied(plan, "webhook", Some("supervisor".to_string()))
}

fn executed_entry() -> AuditEntry {
    let plan = ActionPlan::for_incident("victim@example.com", &Indicators::new());
    let results = ContainmentResults {
        isolate: ActionResult::new("suspended"),
        reset_password: ActionResult::new("password_reset"),
        enforce_mfa: ActionResult::failure("enforce_mfa", "provider unavailable"),
        blocked_domains: BTreeMap::new(),
        quarantine: ActionResult::new("quarantined"),
    };
    AuditEntry::executed(plan, "implicit", None, results)
}

#[derive(Default)]
struct RecordingForwarder {
    received: Mutex<Vec<(String, Option<String>)>>,
}

#[async_trait]
impl AuditForwarder for RecordingForwarder {
    async fn forward(&self, body: &str, signature: Option<&str>) -> Result<(), AuditError> {
        self.received
            .lock()
            .await
            .push((body.to_string(), signature.map(str::to_string)));
        Ok(())
    }
}

struct FailingForwarder;

#[async_trait]
impl AuditForwarder for FailingForwarder {
    async fn forward(&self, _body: &str, _signature: Option<&str>) -> Result<(), AuditError> {
        Err(AuditError::Forward("collector unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_writes_one_json_line_per_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&config(&path)).unwrap();

    logger.record(denied_entry()).await;
    logger.record(executed_entry()).await;

    let lines = read_records(&path).await.unwrap();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(first["approved"], false);
    assert_eq!(first["outcome"], "denied");
    assert_eq!(first["approver"], "supervisor");
    assert!(first["timestamp"].is_string());
    assert!(first.get("results").is_none());
    assert!(first.get(SIGNATURE_FIELD).is_none());

    let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
    assert_eq!(second["approved"], true);
    assert_eq!(second["results"]["enforce_mfa"]["status"], "failed");
}

#[tokio::test]
async fn test_signed_records_verify() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&AuditConfig {
        signing_key: Some("audit-secret".to_string()),
        ..config(&path)
    })
    .unwrap();

    logger.record(denied_entry()).await;

    let lines = read_records(&path).await.unwrap();
    let line = &lines[0];
    assert!(verify_record(line, b"audit-secret"));
    assert!(!verify_record(line, b"another-secret"));

    let mut value: serde_json::Value = serde_json::from_str(line).unwrap();
    let signature = value
        .as_object_mut()
        .unwrap()
        .remove(SIGNATURE_FIELD)
        .unwrap();
    let unsigned = serde_json::to_string(&value).unwrap();
    assert_eq!(signature, sign_payload(b"audit-secret", &unsigned));
}

#[tokio::test]
async fn test_tampered_record_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&AuditConfig {
        signing_key: Some("audit-secret".to_string()),
        ..config(&path)
    })
    .unwrap();

    logger.record(denied_entry()).await;

    let line = read_records(&path).await.unwrap().remove(0);
    let tampered = line.replace("\"approved\":false", "\"approved\":true");
    assert_ne!(line, tampered);
    assert!(!verify_record(&tampered, b"audit-secret"));
}

#[tokio::test]
async fn test_rotation_keeps_bounded_archives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&AuditConfig {
        max_bytes: 1024,
        backup_count: 2,
        ..config(&path)
    })
    .unwrap();

    for _ in 0..30 {
        logger.record(denied_entry()).await;
    }

    let archive = |n: usize| dir.path().join(format!("audit.log.{}", n));
    assert!(archive(1).exists());
    assert!(archive(2).exists());
    assert!(!archive(3).exists());

    for file in [path.clone(), archive(1), archive(2)] {
        let size = std::fs::metadata(&file).unwrap().len();
        assert!(size <= 1024, "{} is {} bytes", file.display(), size);
        for line in read_records(&file).await.unwrap() {
            serde_json::from_str::<serde_json::Value>(&line).unwrap();
        }
    }
}

#[tokio::test]
async fn test_forwarder_receives_signed_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let forwarder = Arc::new(RecordingForwarder::default());
    let logger = AuditLogger::new(&AuditConfig {
        signing_key: Some("audit-secret".to_string()),
        ..config(&path)
    })
    .unwrap()
    .with_forwarder(forwarder.clone());

    logger.record(denied_entry()).await;

    let local = read_records(&path).await.unwrap().remove(0);
    let received = forwarder.received.lock().await;
    assert_eq!(received.len(), 1);
    let (body, signature) = &received[0];
    assert_eq!(body, &local);

    let value: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(
        signature.as_deref(),
        value[SIGNATURE_FIELD].as_str(),
        "header signature matches the embedded one"
    );
}

#[tokio::test]
async fn test_unsigned_forward_has_no_signature() {
    let dir = tempfile::tempdir().unwrap();
    let forwarder = Arc::new(RecordingForwarder::default());
    let logger = AuditLogger::new(&config(&dir.path().join("audit.log")))
        .unwrap()
        .with_forwarder(forwarder.clone());

    logger.record(executed_entry()).await;

    let received = forwarder.received.lock().await;
    assert_eq!(received.len(), 1);
    assert!(received[0].1.is_none());
}

#[tokio::test]
async fn test_forwarding_failure_keeps_local_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&config(&path))
        .unwrap()
        .with_forwarder(Arc::new(FailingForwarder));

    logger.try_record(denied_entry()).await.unwrap();
    logger.record(denied_entry()).await;

    assert_eq!(read_records(&path).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_forwarding_to_unreachable_collector_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&AuditConfig {
        forward_url: Some("http://127.0.0.1:9/audit".to_string()),
        forward_timeout_secs: 1,
        ..config(&path)
    })
    .unwrap();

    logger.try_record(denied_entry()).await.unwrap();
    assert_eq!(read_records(&path).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_write_failure_does_not_propagate_from_record() {
    let dir = tempfile::tempdir().unwrap();
    // The target path is a directory, so opening it for append fails.
    let logger = AuditLogger::new(&config(dir.path())).unwrap();

    assert!(logger.try_record(denied_entry()).await.is_err());
    logger.record(denied_entry()).await;
}

#[tokio::test]
async fn test_concurrent_records_do_not_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = Arc::new(AuditLogger::new(&config(&path)).unwrap());

    let mut handles = Vec::new();
    for i in 0..40 {
        let logger = Arc::clone(&logger);
        handles.push(tokio::spawn(async move {
            let entry = if i % 2 == 0 {
                denied_entry()
            } else {
                executed_entry()
            };
            logger.record(entry).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let lines = read_records(&path).await.unwrap();
    assert_eq!(lines.len(), 40);
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["account"], "victim@example.com");
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_log_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.log");
    let logger = AuditLogger::new(&config(&path)).unwrap();
    logger.record(denied_entry()).await;

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
