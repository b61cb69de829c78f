//! Chat API: one dialogue machine per session.
//!
//! Endpoints:
//!
//! - `GET|POST /chats/new/name/{name}`  Open a session, returns its ID
//! - `POST     /chats/id/{id}/message`  Send a message, returns the bot reply
//! - `GET      /chats/id/{id}`          Session history and dialogue state
//! - `GET      /users`                  Names of users with open sessions

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use leasebot_agent::{DialogueMachine, MachineSnapshot};
use leasebot_config::BotData;
use leasebot_core::{ChatSession, Clock, Message, SessionId, SummaryStore, User};

// ── State ─────────────────────────────────────────────────────────────────

/// Maximum number of open sessions before the oldest is evicted.
const MAX_SESSIONS: usize = 1_000;

/// A chat history plus the machine that produces its replies.
pub struct Session {
    pub chat: ChatSession,
    pub machine: DialogueMachine,
}

#[derive(Default)]
pub struct SessionTable {
    next_id: u64,
    sessions: HashMap<SessionId, Arc<Mutex<Session>>>,
}

impl SessionTable {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Shared state for the chat API.
pub struct ChatState {
    pub bot_data: Arc<BotData>,
    pub store: Arc<dyn SummaryStore>,
    pub clock: Arc<dyn Clock>,
    /// Base seed; each session adds its own ID.
    pub seed: Option<u64>,
    /// Creation takes the write lock, so IDs are handed out one at a time.
    pub sessions: RwLock<SessionTable>,
}

pub type SharedChatState = Arc<ChatState>;

impl ChatState {
    pub fn new(bot_data: Arc<BotData>, store: Arc<dyn SummaryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bot_data,
            store,
            clock,
            seed: None,
            sessions: RwLock::new(SessionTable::default()),
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn new_machine(&self, id: SessionId) -> DialogueMachine {
        let machine = DialogueMachine::new(self.bot_data.clone(), self.store.clone())
            .with_clock(self.clock.clone());
        match self.seed {
            Some(seed) => machine.with_seed(seed.wrapping_add(id.0)),
            None => machine,
        }
    }

    async fn session(&self, id: u64) -> Result<Arc<Mutex<Session>>, StatusCode> {
        let table = self.sessions.read().await;
        table
            .sessions
            .get(&SessionId(id))
            .cloned()
            .ok_or(StatusCode::NOT_FOUND)
    }
}

pub fn chat_router(state: SharedChatState) -> Router {
    Router::new()
        .route(
            "/chats/new/name/{name}",
            get(new_chat_handler).post(new_chat_handler),
        )
        .route("/chats/id/{id}/message", post(message_handler))
        .route("/chats/id/{id}", get(get_chat_handler))
        .route("/users", get(list_users_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: SessionId,
    pub user: User,
    pub messages: Vec<Message>,
    pub state: MachineSnapshotDto,
}

/// Dialogue position as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize)]
pub struct MachineSnapshotDto {
    pub current: String,
    pub previous: String,
    pub data: leasebot_core::ContractData,
}

impl From<MachineSnapshot> for MachineSnapshotDto {
    fn from(snapshot: MachineSnapshot) -> Self {
        Self {
            current: snapshot.state,
            previous: snapshot.previous.name().to_string(),
            data: snapshot.data,
        }
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn new_chat_handler(
    State(state): State<SharedChatState>,
    Path(name): Path<String>,
) -> Json<SessionId> {
    let mut table = state.sessions.write().await;

    if table.sessions.len() >= MAX_SESSIONS {
        let mut oldest = None;
        for (id, session) in &table.sessions {
            let created = session.lock().await.chat.created_at;
            if oldest.is_none_or(|(_, at)| created < at) {
                oldest = Some((*id, created));
            }
        }
        if let Some((id, _)) = oldest {
            debug!(session = %id, "Evicting oldest session");
            table.sessions.remove(&id);
        }
    }

    table.next_id += 1;
    let id = SessionId(table.next_id);

    let mut machine = state.new_machine(id);
    let mut chat = ChatSession::new(id, User::new(name));
    chat.push(Message::bot(machine.greet()));

    info!(session = %id, user = %chat.user.name, "Chat session opened");
    table
        .sessions
        .insert(id, Arc::new(Mutex::new(Session { chat, machine })));

    Json(id)
}

async fn message_handler(
    State(state): State<SharedChatState>,
    Path(id): Path<u64>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<Message>, StatusCode> {
    let session = state.session(id).await?;
    let mut session = session.lock().await;

    let sender = session.chat.user.name.clone();
    session.chat.push(Message::user(sender, &payload.content));

    let reply = session.machine.respond(&payload.content);
    debug!(
        session = id,
        state = %session.machine.state(),
        "Message answered"
    );

    let message = Message::bot(reply);
    session.chat.push(message.clone());
    Ok(Json(message))
}

async fn get_chat_handler(
    State(state): State<SharedChatState>,
    Path(id): Path<u64>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let session = state.session(id).await?;
    let session = session.lock().await;

    Ok(Json(ChatResponse {
        id: session.chat.id,
        user: session.chat.user.clone(),
        messages: session.chat.messages.clone(),
        state: session.machine.snapshot().into(),
    }))
}

async fn list_users_handler(State(state): State<SharedChatState>) -> Json<Vec<String>> {
    let sessions: Vec<Arc<Mutex<Session>>> = {
        let table = state.sessions.read().await;
        table.sessions.values().cloned().collect()
    };

    let mut names = BTreeSet::new();
    for session in sessions {
        names.insert(session.lock().await.chat.user.name.clone());
    }
    Json(names.into_iter().collect())
}
