//! Console adapter - JSON-lines requests on stdin, replies on stdout
//!
//! Each input line is one request tagged with its `type`. Each request yields
//! exactly one reply line, followed by one line per domain event the request
//! published.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::application::commands::{
    CreateCommentCommand, CreateProjectCommand, CreateTodoCommand, DeleteCommentCommand,
    DeleteProjectCommand, DeleteTodoCommand, UpdateCommentCommand, UpdateProjectCommand,
    UpdateTodoCommand,
};
use crate::application::error::{AppError, AppResult};
use crate::application::pipeline::Mediator;
use crate::application::queries::{
    GetAllProjectsQuery, GetAllTodosQuery, GetCommentByIdQuery, GetCommentsForTodoQuery,
    GetProjectByIdQuery, GetProjectStatsQuery, GetTodoByIdQuery,
};
use crate::domain::events::DomainEvent;
use crate::domain::value_objects::FieldError;

/// Requests accepted on the console
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleMessage {
    // Todo items
    CreateTodo(CreateTodoCommand),
    UpdateTodo(UpdateTodoCommand),
    DeleteTodo(DeleteTodoCommand),
    GetAllTodos,
    GetTodoById(GetTodoByIdQuery),

    // Projects
    CreateProject(CreateProjectCommand),
    UpdateProject(UpdateProjectCommand),
    DeleteProject(DeleteProjectCommand),
    GetAllProjects,
    GetProjectById(GetProjectByIdQuery),
    GetProjectStats(GetProjectStatsQuery),

    // Comments
    CreateComment(CreateCommentCommand),
    UpdateComment(UpdateCommentCommand),
    DeleteComment(DeleteCommentCommand),
    GetCommentsForTodo(GetCommentsForTodoQuery),
    GetCommentById(GetCommentByIdQuery),
}

/// One output line
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsoleReply {
    Ok {
        data: serde_json::Value,
    },
    Error {
        kind: &'static str,
        message: String,
        errors: Vec<FieldError>,
    },
    Event(DomainEvent),
}

impl ConsoleReply {
    fn bad_request(message: impl Into<String>) -> Self {
        ConsoleReply::Error {
            kind: "bad_request",
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl From<AppError> for ConsoleReply {
    fn from(error: AppError) -> Self {
        let errors = match &error {
            AppError::Validation(validation) => validation.errors().to_vec(),
            _ => Vec::new(),
        };
        ConsoleReply::Error {
            kind: error.kind(),
            message: error.to_string(),
            errors,
        }
    }
}

fn reply<T: Serialize>(result: AppResult<T>) -> ConsoleReply {
    match result {
        Ok(data) => match serde_json::to_value(&data) {
            Ok(data) => ConsoleReply::Ok { data },
            Err(e) => ConsoleReply::Error {
                kind: "internal",
                message: format!("Failed to serialize response: {}", e),
                errors: Vec::new(),
            },
        },
        Err(e) => e.into(),
    }
}

async fn dispatch(
    mediator: &Mediator,
    message: ConsoleMessage,
    cancel: &CancellationToken,
) -> ConsoleReply {
    match message {
        ConsoleMessage::CreateTodo(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::UpdateTodo(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::DeleteTodo(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::GetAllTodos => reply(mediator.send(&GetAllTodosQuery, cancel).await),
        ConsoleMessage::GetTodoById(q) => reply(mediator.send(&q, cancel).await),

        ConsoleMessage::CreateProject(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::UpdateProject(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::DeleteProject(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::GetAllProjects => {
            reply(mediator.send(&GetAllProjectsQuery, cancel).await)
        }
        ConsoleMessage::GetProjectById(q) => reply(mediator.send(&q, cancel).await),
        ConsoleMessage::GetProjectStats(q) => reply(mediator.send(&q, cancel).await),

        ConsoleMessage::CreateComment(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::UpdateComment(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::DeleteComment(c) => reply(mediator.send(&c, cancel).await),
        ConsoleMessage::GetCommentsForTodo(q) => reply(mediator.send(&q, cancel).await),
        ConsoleMessage::GetCommentById(q) => reply(mediator.send(&q, cancel).await),
    }
}

/// Parse and dispatch one line, cancelling the request once `timeout` elapses
pub async fn handle_line(mediator: &Mediator, line: &str, timeout: Duration) -> ConsoleReply {
    let message: ConsoleMessage = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Malformed console request");
            return ConsoleReply::bad_request(format!("Malformed request: {}", e));
        }
    };

    let cancel = CancellationToken::new();
    let timer = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };

    let reply = dispatch(mediator, message, &cancel).await;
    timer.abort();
    reply
}

async fn write_line<W>(output: &mut W, reply: &ConsoleReply) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(reply).context("Failed to serialize console reply")?;
    line.push(b'\n');
    output
        .write_all(&line)
        .await
        .context("Failed to write console reply")?;
    output.flush().await.context("Failed to flush console output")?;
    Ok(())
}

/// Serve requests from `input` until it is exhausted
pub async fn run<R, W>(
    mediator: &Mediator,
    events: &mut mpsc::UnboundedReceiver<DomainEvent>,
    timeout: Duration,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read console input")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let reply = handle_line(mediator, &line, timeout).await;
        write_line(&mut output, &reply).await?;

        while let Ok(event) = events.try_recv() {
            write_line(&mut output, &ConsoleReply::Event(event)).await?;
        }
    }

    debug!("Console input closed");
    Ok(())
}
