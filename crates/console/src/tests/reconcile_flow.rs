//! End-to-end reconciliation flows against the mock gateway.

use std::sync::Arc;

use crate::console::Console;
use crate::types::{FileStatus, UploadRequest};
use vectordeck_core::AppError;
use vectordeck_gateway::providers::mock::{file_record, store_record, MockGateway};
use vectordeck_gateway::FilePurpose;

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock backend with two processed files and one store containing the
    /// first of them.
    async fn seeded() -> (Arc<MockGateway>, Console) {
        let gateway = Arc::new(MockGateway::new());
        gateway.push_file(file_record("file_a", "a.pdf", 4096)).await;
        gateway.push_file(file_record("file_b", "b.csv", 1024)).await;
        gateway
            .push_store(store_record("vs_1", Some("docs")), vec!["file_a".into()])
            .await;

        let console = Console::new(gateway.clone());
        (gateway, console)
    }

    fn upload(name: &str) -> UploadRequest {
        UploadRequest {
            name: name.to_string(),
            content: b"payload".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_refresh_populates_view() {
        let (_gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();

        assert_eq!(console.files().len(), 2);
        assert_eq!(console.vector_stores().len(), 1);
        assert_eq!(console.membership_count("file_a"), 1);
        assert_eq!(console.membership_count("file_b"), 0);
        assert_eq!(
            console.file("file_a").unwrap().status,
            FileStatus::Processed
        );
    }

    #[tokio::test]
    async fn test_refresh_fails_cleanly_when_unreachable() {
        let (gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();

        gateway.set_unreachable(true).await;
        let err = console.refresh().await.unwrap_err();
        assert!(err.is_transient());

        // Previous state survives a failed load.
        assert_eq!(console.files().len(), 2);
        assert_eq!(console.membership_count("file_a"), 1);
    }

    #[tokio::test]
    async fn test_upload_aborts_queue_on_first_failure() {
        let (gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();
        gateway.fail_upload("b.txt").await;

        let outcome = console
            .upload_files(
                vec![upload("a.txt"), upload("b.txt"), upload("c.txt")],
                FilePurpose::Assistants,
            )
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].target, "b.txt");
        assert_eq!(outcome.not_attempted, vec!["c.txt".to_string()]);
        assert_eq!(outcome.summary(), "1 of 3 succeeded");

        // The confirmed upload is tracked locally with uploaded status;
        // the failed and never-attempted files are not.
        let uploaded = console.files().iter().find(|f| f.name == "a.txt").unwrap();
        assert_eq!(uploaded.status, FileStatus::Uploaded);
        assert!(!console.files().iter().any(|f| f.name == "b.txt"));
        assert!(!console.files().iter().any(|f| f.name == "c.txt"));
    }

    #[tokio::test]
    async fn test_delete_reports_partial_failure() {
        let (gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();
        gateway.fail_delete("file_a").await;

        let outcome = console
            .delete_files(&["file_a".to_string(), "file_b".to_string()])
            .await
            .unwrap();

        assert_eq!(outcome.summary(), "1 of 2 succeeded");
        assert_eq!(outcome.failed[0].target, "file_a");

        // The failed delete is restored and flagged; the other is gone.
        assert_eq!(console.file("file_a").unwrap().status, FileStatus::Error);
        assert!(console.file("file_b").is_none());

        // The backend agrees on the survivor set.
        let remote = gateway.files_snapshot().await;
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].id, "file_a");
    }

    #[tokio::test]
    async fn test_add_to_store_updates_counts_and_selection() {
        let (_gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();
        console.select("file_a").unwrap();
        console.select("file_b").unwrap();

        let before_a = console.membership_count("file_a");
        let before_b = console.membership_count("file_b");

        let outcome = console
            .add_selection_to_store("vs_1")
            .await
            .unwrap();

        assert!(outcome.is_full_success());
        assert_eq!(outcome.succeeded, 2);
        assert!(console.selected_ids().is_empty());

        // file_a was already a member, so its count holds; file_b gained one.
        assert_eq!(console.membership_count("file_a"), before_a);
        assert_eq!(console.membership_count("file_b"), before_b + 1);
        assert_eq!(
            console.file("file_b").unwrap().status,
            FileStatus::Processed
        );
    }

    #[tokio::test]
    async fn test_add_to_fresh_store_increments_both() {
        let (gateway, mut console) = seeded().await;
        gateway
            .push_store(store_record("vs_Y", Some("fresh")), Vec::new())
            .await;
        console.refresh().await.unwrap();
        console.select("file_a").unwrap();
        console.select("file_b").unwrap();

        let before_a = console.membership_count("file_a");
        let before_b = console.membership_count("file_b");

        let outcome = console.add_selection_to_store("vs_Y").await.unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(console.membership_count("file_a"), before_a + 1);
        assert_eq!(console.membership_count("file_b"), before_b + 1);
        assert!(console.selected_ids().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_store_rolls_back_failed_item() {
        let (gateway, mut console) = seeded().await;
        gateway
            .push_store(store_record("vs_Y", None), Vec::new())
            .await;
        gateway.fail_attach("file_b").await;
        console.refresh().await.unwrap();

        let outcome = console
            .add_to_store(&["file_a".to_string(), "file_b".to_string()], "vs_Y")
            .await
            .unwrap();

        assert_eq!(outcome.summary(), "1 of 2 succeeded");
        assert_eq!(console.membership_count("file_a"), 2);

        // The failed item's optimistic membership was rolled back exactly;
        // only the error flag remains.
        let entry_b = console.file("file_b").unwrap();
        assert!(entry_b.store_ids.is_empty());
        assert_eq!(entry_b.status, FileStatus::Error);
        assert_eq!(console.membership_count("file_b"), 0);
    }

    #[tokio::test]
    async fn test_error_status_recovers_on_fresh_load() {
        let (gateway, mut console) = seeded().await;
        gateway.fail_delete("file_a").await;
        console.refresh().await.unwrap();

        console
            .delete_files(&["file_a".to_string()])
            .await
            .unwrap();
        assert_eq!(console.file("file_a").unwrap().status, FileStatus::Error);

        console.refresh().await.unwrap();
        assert_eq!(
            console.file("file_a").unwrap().status,
            FileStatus::Processed
        );
    }

    #[tokio::test]
    async fn test_empty_batches_are_rejected() {
        let (_gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();

        for result in [
            console.add_to_store(&[], "vs_1").await.err(),
            console.delete_files(&[]).await.err(),
            console
                .upload_files(Vec::new(), FilePurpose::Assistants)
                .await
                .err(),
        ] {
            match result {
                Some(AppError::Validation(_)) => {}
                other => panic!("Expected validation error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_target_fails_client_side() {
        let (gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();
        let scans_before = gateway.scan_calls().await;

        let outcome = console
            .add_to_store(&["ghost".to_string()], "vs_1")
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 0);
        assert_eq!(outcome.failed.len(), 1);
        assert!(outcome.failed[0].message.contains("Unknown file"));
        // Nothing succeeded, so the selection-clearing rebuild still ran;
        // the ghost id itself never reached the backend.
        assert!(gateway.scan_calls().await >= scans_before);
    }

    #[tokio::test]
    async fn test_duplicate_targets_collapse() {
        let (_gateway, mut console) = seeded().await;
        console.refresh().await.unwrap();

        let outcome = console
            .delete_files(&["file_b".to_string(), "file_b".to_string()])
            .await
            .unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert!(outcome.is_full_success());
        assert!(console.file("file_b").is_none());
    }
}
