use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use analyzer_shared::protocol::{
    ChatRequest, ChatResponse, FaqEntry, FaqResponse, HistoryResponse, WireMessage,
};
use analyzer_shared::types::{AgentType, Role};

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Message log keyed by chat id.  In-memory only; a process restart
/// starts from an empty log.
type ChatLog = HashMap<String, Vec<WireMessage>>;

#[derive(Clone)]
pub struct AppState {
    pub log: Arc<Mutex<ChatLog>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            log: Arc::new(Mutex::new(ChatLog::new())),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/history", get(history))
        .route("/faq", get(faq))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct RootResponse {
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct HistoryParams {
    chat_id: Option<String>,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Welcome to {} API", state.config.instance_name),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Answer a transcript with the canned per-agent reply and record the
/// exchange in the log.
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let last_user = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .ok_or_else(|| ServerError::BadRequest("Request contains no user message".to_string()))?
        .clone();

    let reply = WireMessage {
        content: canned_reply(request.agent_type, &last_user.content),
        role: Role::Assistant,
    };

    let chat_id = Uuid::new_v4().to_string();
    {
        let mut log = state.log.lock().await;
        let entry = log.entry(chat_id.clone()).or_default();
        entry.push(last_user);
        entry.push(reply.clone());
    }

    info!(chat = %chat_id, agent = %request.agent_type, "Handled chat request");

    Ok(Json(ChatResponse {
        message: reply,
        chat_id: Some(chat_id),
    }))
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let log = state.log.lock().await;

    let history = match params.chat_id {
        Some(id) => {
            let messages = log.get(&id).cloned().unwrap_or_default();
            HashMap::from([(id, messages)])
        }
        None => log.clone(),
    };

    Json(HistoryResponse { history })
}

async fn faq() -> Json<FaqResponse> {
    let faqs = [
        (
            "What can Inventory Analyzer AI do?",
            "It can analyze inventory data and provide insights.",
        ),
        (
            "How do I use the Summary Agent?",
            "Select the Summary Agent option for concise analysis.",
        ),
        (
            "How do I use the Chatbot Agent?",
            "Select the Chatbot Agent option for interactive conversations.",
        ),
    ]
    .into_iter()
    .map(|(question, answer)| FaqEntry {
        question: question.to_string(),
        answer: answer.to_string(),
    })
    .collect();

    Json(FaqResponse { faqs })
}

/// Placeholder reply until a real analysis pipeline is wired in.
/// Deterministic per agent type and prompt.
fn canned_reply(agent_type: AgentType, prompt: &str) -> String {
    match agent_type {
        AgentType::Summary => format!(
            "Summary of your request \"{prompt}\": the analysis pipeline is not connected yet."
        ),
        AgentType::Chatbot => format!(
            "You asked: \"{prompt}\". The conversational pipeline is not connected yet."
        ),
    }
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(ServerConfig::default())
    }

    #[tokio::test]
    async fn test_chat_answers_and_records_the_exchange() {
        let state = test_state();
        let request = ChatRequest {
            messages: vec![WireMessage {
                content: "How many SKUs are out of stock?".to_string(),
                role: Role::User,
            }],
            agent_type: AgentType::Chatbot,
        };

        let Json(response) = chat(State(state.clone()), Json(request)).await.unwrap();

        assert_eq!(response.message.role, Role::Assistant);
        assert!(response.message.content.contains("How many SKUs are out of stock?"));

        let chat_id = response.chat_id.unwrap();
        let log = state.log.lock().await;
        let entry = log.get(&chat_id).unwrap();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry[0].role, Role::User);
        assert_eq!(entry[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_chat_without_user_message_is_rejected() {
        let state = test_state();
        let request = ChatRequest {
            messages: Vec::new(),
            agent_type: AgentType::Summary,
        };

        let result = chat(State(state), Json(request)).await;
        assert!(matches!(result, Err(ServerError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_history_filters_by_chat_id() {
        let state = test_state();

        for prompt in ["first", "second"] {
            let request = ChatRequest {
                messages: vec![WireMessage {
                    content: prompt.to_string(),
                    role: Role::User,
                }],
                agent_type: AgentType::Summary,
            };
            chat(State(state.clone()), Json(request)).await.unwrap();
        }

        let Json(all) = history(
            State(state.clone()),
            Query(HistoryParams { chat_id: None }),
        )
        .await;
        assert_eq!(all.history.len(), 2);

        let some_id = all.history.keys().next().unwrap().clone();
        let Json(one) = history(
            State(state),
            Query(HistoryParams {
                chat_id: Some(some_id.clone()),
            }),
        )
        .await;
        assert_eq!(one.history.len(), 1);
        assert_eq!(one.history[&some_id].len(), 2);
    }

    #[tokio::test]
    async fn test_history_unknown_chat_id_is_empty() {
        let state = test_state();
        let Json(response) = history(
            State(state),
            Query(HistoryParams {
                chat_id: Some("missing".to_string()),
            }),
        )
        .await;

        assert_eq!(response.history["missing"], Vec::new());
    }

    #[tokio::test]
    async fn test_faq_returns_the_fixed_set() {
        let Json(response) = faq().await;
        assert_eq!(response.faqs.len(), 3);
        assert_eq!(response.faqs[0].question, "What can Inventory Analyzer AI do?");
    }

    #[test]
    fn test_canned_replies_differ_per_agent() {
        let summary = canned_reply(AgentType::Summary, "stock levels");
        let chatbot = canned_reply(AgentType::Chatbot, "stock levels");
        assert_ne!(summary, chatbot);
        assert!(summary.contains("stock levels"));
        assert!(chatbot.contains("stock levels"));
    }
}
