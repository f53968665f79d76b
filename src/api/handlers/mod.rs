use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{self, AuthUser};
use crate::chat::{self, ChatContext, Command};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::state::AppState;
use crate::timer::TimerSnapshot;

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Auth
// ============================================================

pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let username = input.username.trim();
    if username.is_empty() || input.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }
    if input.password.len() < auth::MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            auth::MIN_PASSWORD_LEN
        )));
    }

    if state
        .db
        .find_user_by_username(username)
        .map_err(AppError::Internal)?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let hash = auth::hash_password(&input.password)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    let user = state
        .db
        .create_user(username, &hash)
        .map_err(AppError::Internal)?;

    let token = auth::issue_token(user.id, &user.username, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::info!(username = %user.username, "new user signed up");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<CredentialsInput>,
) -> AppResult<Json<AuthResponse>> {
    let username = input.username.trim();
    if username.is_empty() || input.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    // The same error for unknown user and bad password, so login attempts
    // can't probe which usernames exist.
    let invalid = || AppError::Auth("Invalid username or password".into());

    let record = state
        .db
        .find_user_by_username(username)
        .map_err(AppError::Internal)?
        .ok_or_else(invalid)?;

    let verified = auth::verify_password(&input.password, &record.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let user = record.user;
    let token = auth::issue_token(user.id, &user.username, &state.config.jwt_secret)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(AuthResponse { token, user }))
}

/// Ends the server-side session: timer and transcript are discarded and the
/// ticker task aborted. The token itself simply stops being presented.
pub async fn logout(user: AuthUser, State(state): State<AppState>) -> StatusCode {
    state.sessions.end_session(user.user_id);
    StatusCode::NO_CONTENT
}

// ============================================================
// Notes
// ============================================================

/// Query parameters for listing notes.
#[derive(Debug, Deserialize)]
pub struct ListNotesQuery {
    /// Case-insensitive filter over title, content, and tags.
    pub q: Option<String>,
}

pub async fn list_notes(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListNotesQuery>,
) -> AppResult<Json<Vec<Note>>> {
    let mut notes = state
        .db
        .notes_for_user(user.user_id)
        .map_err(AppError::Internal)?;

    if let Some(term) = query.q.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        notes.retain(|note| note.matches(term));
    }

    Ok(Json(notes))
}

pub async fn create_note(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNoteInput>,
) -> AppResult<(StatusCode, Json<Note>)> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required".into(),
        ));
    }

    let note = state
        .db
        .create_note(user.user_id, input)
        .map_err(AppError::Internal)?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update_note(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateNoteInput>,
) -> AppResult<Json<Note>> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty())
        || input.content.as_deref().is_some_and(|c| c.trim().is_empty())
    {
        return Err(AppError::Validation(
            "Title and content cannot be empty".into(),
        ));
    }

    state
        .db
        .update_note(id, user.user_id, input)
        .map_err(AppError::Internal)?
        .map(Json)
        .ok_or(AppError::NotFound("Note"))
}

pub async fn delete_note(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state
        .db
        .delete_note(id, user.user_id)
        .map_err(AppError::Internal)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Note"))
    }
}

// ============================================================
// Timer
// ============================================================

pub async fn get_timer(user: AuthUser, State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.sessions.session_for(user.user_id).timer_snapshot())
}

pub async fn start_timer(user: AuthUser, State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.sessions.session_for(user.user_id).start_timer())
}

pub async fn pause_timer(user: AuthUser, State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.sessions.session_for(user.user_id).pause_timer())
}

pub async fn reset_timer(user: AuthUser, State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.sessions.session_for(user.user_id).reset_timer())
}

pub async fn skip_timer(user: AuthUser, State(state): State<AppState>) -> Json<TimerSnapshot> {
    Json(state.sessions.session_for(user.user_id).skip_timer())
}

/// Input for updating timer durations. Values are clamped, not rejected.
#[derive(Debug, Deserialize)]
pub struct TimerSettingsInput {
    pub study_minutes: Option<u32>,
    pub break_minutes: Option<u32>,
}

pub async fn update_timer_settings(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TimerSettingsInput>,
) -> Json<TimerSnapshot> {
    Json(
        state
            .sessions
            .session_for(user.user_id)
            .configure_timer(input.study_minutes, input.break_minutes),
    )
}

// ============================================================
// Chat
// ============================================================

pub async fn get_transcript(
    user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<ChatMessage>> {
    Json(state.sessions.session_for(user.user_id).transcript())
}

pub async fn send_message(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessageInput>,
) -> AppResult<Json<ChatMessage>> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Message text is required".into()));
    }

    let session = state.sessions.session_for(user.user_id);
    session.push_message(ChatMessage::from_user(text));

    let ctx = ChatContext {
        timer: session.timer_snapshot(),
        note_count: state
            .db
            .count_notes(user.user_id)
            .map_err(AppError::Internal)?,
    };
    let reply = chat::respond(text, &ctx);

    // Simulated "thinking". Cosmetic only; zero in tests.
    if !state.config.reply_delay.is_zero() {
        tokio::time::sleep(state.config.reply_delay).await;
    }

    if let Some(command) = reply.command {
        execute_command(&state, &session, user.user_id, command)?;
    }

    let message = ChatMessage::from_bot(reply.text);
    session.push_message(message.clone());
    Ok(Json(message))
}

/// Apply a responder command to the caller's timer session or notes.
fn execute_command(
    state: &AppState,
    session: &crate::session::UserSession,
    user_id: Uuid,
    command: Command,
) -> AppResult<()> {
    match command {
        Command::StartTimer => {
            session.start_timer();
        }
        Command::PauseTimer => {
            session.pause_timer();
        }
        Command::ResetTimer => {
            session.reset_timer();
        }
        Command::SetStudyMinutes(minutes) => {
            session.configure_timer(Some(minutes), None);
        }
        Command::SetBreakMinutes(minutes) => {
            session.configure_timer(None, Some(minutes));
        }
        Command::CreateNote { title, content } => {
            state
                .db
                .create_note(
                    user_id,
                    CreateNoteInput {
                        title,
                        content,
                        tags: vec!["chat".to_string()],
                    },
                )
                .map_err(AppError::Internal)?;
        }
    }
    Ok(())
}
