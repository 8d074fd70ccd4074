//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use cotacao_types::{Deadline, DeadlineError, Quote, QuoteRepository, StoreError};

    use crate::SqliteRepo;

    const GENEROUS: Duration = Duration::from_secs(5);

    async fn setup_repo() -> SqliteRepo {
        let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
        repo.create_schema().await.unwrap();
        repo
    }

    async fn stored_bids(repo: &SqliteRepo) -> Vec<String> {
        sqlx::query_scalar("SELECT bid FROM cotacoes ORDER BY rowid")
            .fetch_all(repo.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_quote() {
        let repo = setup_repo().await;
        let quote = Quote::new("5.4321");

        let record = repo
            .save(&quote, &Deadline::after(GENEROUS))
            .await
            .unwrap();

        assert_eq!(record.bid, "5.4321");
        assert_eq!(stored_bids(&repo).await, vec!["5.4321".to_string()]);
    }

    #[tokio::test]
    async fn test_save_stamps_server_time() {
        let repo = setup_repo().await;
        let before = chrono::Utc::now();

        let record = repo
            .save(&Quote::new("5.10"), &Deadline::after(GENEROUS))
            .await
            .unwrap();

        assert!(record.recorded_at >= before);
        assert!(record.recorded_at <= chrono::Utc::now());

        let stored: chrono::DateTime<chrono::Utc> =
            sqlx::query_scalar("SELECT data FROM cotacoes")
                .fetch_one(repo.pool())
                .await
                .unwrap();
        assert_eq!(stored.timestamp(), record.recorded_at.timestamp());
    }

    #[tokio::test]
    async fn test_save_appends() {
        let repo = setup_repo().await;

        for bid in ["5.01", "5.02", "5.03"] {
            repo.save(&Quote::new(bid), &Deadline::after(GENEROUS))
                .await
                .unwrap();
        }

        assert_eq!(stored_bids(&repo).await, vec!["5.01", "5.02", "5.03"]);
    }

    #[tokio::test]
    async fn test_save_under_expired_deadline_writes_nothing() {
        let repo = setup_repo().await;
        let parent = Deadline::after(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;
        let deadline = parent.derive(Duration::from_millis(10));

        let result = repo.save(&Quote::new("5.43"), &deadline).await;

        assert!(matches!(
            result,
            Err(StoreError::Deadline(DeadlineError::Exceeded { .. }))
        ));
        assert!(stored_bids(&repo).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_under_cancelled_deadline() {
        let repo = setup_repo().await;
        let deadline = Deadline::after(GENEROUS);
        deadline.cancel();

        let result = repo.save(&Quote::new("5.43"), &deadline).await;

        assert!(matches!(
            result,
            Err(StoreError::Deadline(DeadlineError::Cancelled))
        ));
    }

    #[tokio::test]
    async fn test_save_without_schema_is_database_error() {
        let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();

        let result = repo
            .save(&Quote::new("5.43"), &Deadline::after(GENEROUS))
            .await;

        match result {
            Err(StoreError::Database(msg)) => assert!(msg.contains("cotacoes")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_saves() {
        let repo = Arc::new(setup_repo().await);

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    let quote = Quote::new(format!("5.{:02}", i));
                    repo.save(&quote, &Deadline::after(GENEROUS)).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(stored_bids(&repo).await.len(), 10);
    }

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let repo = setup_repo().await;
        repo.create_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_on_disk_database_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cotacoes.db");
        let url = format!("sqlite://{}", path.display());

        let repo = SqliteRepo::new(&url).await.unwrap();
        repo.create_schema().await.unwrap();
        repo.save(&Quote::new("5.43"), &Deadline::after(GENEROUS))
            .await
            .unwrap();

        assert!(path.exists());
    }
}
