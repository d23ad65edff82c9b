use std::future::{Future, ready};

use thiserror::Error;

use super::model::SubmissionRecord;

/// The collaborator a valid submission is handed to.
pub trait LoginHandler {
    fn login(&self, record: SubmissionRecord) -> Result<(), LoginRejected>;
}

impl<F> LoginHandler for F
where
    F: Fn(SubmissionRecord) -> Result<(), LoginRejected>,
{
    fn login(&self, record: SubmissionRecord) -> Result<(), LoginRejected> {
        (self)(record)
    }
}

/// Async counterpart of [`LoginHandler`], for collaborators that talk to a
/// backend.
pub trait AsyncLoginHandler {
    fn login(&self, record: SubmissionRecord) -> impl Future<Output = Result<(), LoginRejected>>;
}

impl<F, Fut> AsyncLoginHandler for F
where
    F: Fn(SubmissionRecord) -> Fut,
    Fut: Future<Output = Result<(), LoginRejected>>,
{
    fn login(&self, record: SubmissionRecord) -> impl Future<Output = Result<(), LoginRejected>> {
        (self)(record)
    }
}

/// A handler refused the credentials. The message is shown above the form.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct LoginRejected {
    pub message: String,
}

impl LoginRejected {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Placeholder collaborator: logs the record and accepts it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogLoginHandler;

impl LoginHandler for LogLoginHandler {
    fn login(&self, record: SubmissionRecord) -> Result<(), LoginRejected> {
        tracing::info!(
            username = record.username(),
            email = record.email(),
            "login submitted"
        );
        Ok(())
    }
}

impl AsyncLoginHandler for LogLoginHandler {
    fn login(&self, record: SubmissionRecord) -> impl Future<Output = Result<(), LoginRejected>> {
        ready(LoginHandler::login(self, record))
    }
}
