use crate::{
    dto::{CreateNoteRequest, ListNotesQuery, NoteResponse, UpdateNoteRequest},
    repository::{Repository, RepositoryResult, query::ListParams},
};

use std::sync::Arc;

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl NoteService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    /// Expects a request that already passed validation.
    pub async fn create_note(&self, request: CreateNoteRequest) -> RepositoryResult<NoteResponse> {
        let title = request.title.unwrap_or_default();
        let content = request.content.unwrap_or_default();

        self.repo
            .lock()
            .await
            .create_note(&title, &content)
            .map(NoteResponse::from)
    }

    /// Returns `None` when the note does not exist; nothing is written in that case.
    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> RepositoryResult<Option<NoteResponse>> {
        let mut repo = self.repo.lock().await;

        if repo.get_one_note(id)?.is_none() {
            return Ok(None);
        }

        repo.update_note(id, request.into())
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn delete_note(&self, id: i64) -> RepositoryResult<bool> {
        self.repo.lock().await.delete_note(id)
    }

    pub async fn get_one_note(&self, id: i64) -> RepositoryResult<Option<NoteResponse>> {
        self.repo
            .lock()
            .await
            .get_one_note(id)
            .map(|note| note.map(NoteResponse::from))
    }

    pub async fn list_notes(&self, query: &ListNotesQuery) -> RepositoryResult<Vec<NoteResponse>> {
        let params = ListParams::from(query);

        self.repo.lock().await.list_notes(&params).map(|notes| {
            notes
                .into_iter()
                .map(NoteResponse::from)
                .collect()
        })
    }
}
