use crate::domain::parse_record_id;
use crate::domain::session::Session;
use crate::usecase::contracts::SessionRepository;
use crate::usecase::error::UsecaseError;

pub struct SessionsUseCase<S>
where
    S: SessionRepository,
{
    session_repository: S,
}

impl<S> SessionsUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repository: S) -> Self {
        Self { session_repository }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_session(&self) -> Result<Session, UsecaseError> {
        tracing::debug!("creating session");

        let session = Session::new();
        self.session_repository.create(&session).await?;

        tracing::info!(session_id = %session.session_id, "session created successfully");
        Ok(session)
    }

    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    pub async fn get_session(&self, session_id: &str) -> Result<Session, UsecaseError> {
        tracing::debug!("getting session");

        let Some(id) = parse_record_id(session_id) else {
            return Err(UsecaseError::NotFound("Session".to_string()));
        };

        self.session_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Session".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::usecase::contracts::MockSessionRepository;

    #[tokio::test]
    async fn test_create_session() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo.expect_create().times(1).returning(|_| Ok(()));

        let usecase = SessionsUseCase::new(mock_repo);
        let session = usecase.create_session().await.unwrap();

        assert_eq!(session.expires_at - session.created_at.timestamp(), 2_592_000);
    }

    #[tokio::test]
    async fn test_create_session_store_failure() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::Store("unavailable".to_string())));

        let usecase = SessionsUseCase::new(mock_repo);
        let err = usecase.create_session().await.unwrap_err();

        assert!(matches!(err, UsecaseError::Internal(_)));
    }

    #[tokio::test]
    async fn test_get_session() {
        let mut mock_repo = MockSessionRepository::new();
        let session = Session::new();
        let session_id = session.session_id;
        let session_clone = session.clone();

        mock_repo
            .expect_find_by_id()
            .with(eq(session_id))
            .times(1)
            .returning(move |_| Ok(Some(session_clone.clone())));

        let usecase = SessionsUseCase::new(mock_repo);
        let found = usecase.get_session(&session_id.to_string()).await.unwrap();

        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn test_get_session_not_found() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let usecase = SessionsUseCase::new(mock_repo);
        let err = usecase
            .get_session(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Session not found");
    }

    #[tokio::test]
    async fn test_get_session_malformed_id() {
        let usecase = SessionsUseCase::new(MockSessionRepository::new());
        let err = usecase.get_session("nope").await.unwrap_err();

        assert!(matches!(err, UsecaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_session_braced_id_is_not_found() {
        let usecase = SessionsUseCase::new(MockSessionRepository::new());
        let braced = Uuid::new_v4().braced().to_string();

        let err = usecase.get_session(&braced).await.unwrap_err();

        assert_eq!(err.to_string(), "Session not found");
    }
}
