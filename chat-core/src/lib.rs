//! Session-scoped chat orchestration for the citizen assistant.
//!
//! [`ChatEngine`] owns the session registry and drives the single chat
//! flow: idle → awaiting-response → idle|error. It enforces the per-session
//! input and message limits, assembles the prompt from the trailing history
//! and the knowledge base, and logs every appended message. Provider
//! failures never escape: they degrade to a fixed apologetic reply.

mod error;
mod message;
mod prompt;
mod session;

pub use error::ChatError;
pub use message::{Message, Role};
pub use prompt::{HIDDEN_CONTEXT_PREAMBLE, HISTORY_WINDOW, SYSTEM_INSTRUCTION, build_contents};
pub use session::{
    MAX_INPUT_CHARS, MAX_USER_MESSAGES, SessionContext, SessionRegistry, sanitize_input,
};

use std::future::Future;
use std::sync::Arc;

use chat_logger::ChatLogger;
use gemini_service::{Completion, Content, GeminiError, GeminiService};
use state_store::KnowledgeStore;
use tracing::{info, warn};

/// Greeting seeded into every new session.
pub const GREETING: &str = "Merhaba! Ben Yapay Zeka Asistanı Bilgiç. Bakanlık hizmetleri, mevzuat veya yüklediğiniz dokümanlarla ilgili sorularınızı cevaplayabilirim. Nasıl yardımcı olabilirim?";

/// Fixed reply when the provider call fails.
pub const PROVIDER_FAILURE_TEXT: &str =
    "Şu anda sistemsel bir yoğunluk yaşanıyor. Lütfen daha sonra tekrar deneyiniz.";

/// Fixed reply when the provider succeeds but returns no text.
pub const EMPTY_RESPONSE_TEXT: &str =
    "Üzgünüm, şu anda yanıt oluşturulamadı. Lütfen Alo 181 hattını arayınız.";

/// Completion seam: the engine needs exactly one generate call.
pub trait CompletionBackend: Send + Sync {
    fn complete(
        &self,
        contents: &[Content],
        system: &str,
    ) -> impl Future<Output = Result<Completion, GeminiError>> + Send;
}

impl CompletionBackend for GeminiService {
    async fn complete(
        &self,
        contents: &[Content],
        system: &str,
    ) -> Result<Completion, GeminiError> {
        self.generate(contents, system).await
    }
}

/// Assistant reply plus the sends the session still has available.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub reply: Message,
    pub remaining_messages: usize,
}

pub struct ChatEngine<B> {
    backend: B,
    sessions: SessionRegistry,
    knowledge: Arc<KnowledgeStore>,
    logger: Arc<ChatLogger>,
}

impl<B: CompletionBackend> ChatEngine<B> {
    pub fn new(backend: B, knowledge: Arc<KnowledgeStore>, logger: Arc<ChatLogger>) -> Self {
        Self {
            backend,
            sessions: SessionRegistry::new(),
            knowledge,
            logger,
        }
    }

    /// Opens a session seeded with the assistant greeting; the greeting is
    /// logged like any other message.
    pub async fn open_session(&self, user_agent: &str) -> (String, Message) {
        let id = services::new_session_id();
        let greeting = Message::model(GREETING.to_string(), Vec::new());

        let mut ctx = SessionContext::new(id.clone(), user_agent.to_string());
        ctx.push(greeting.clone());
        self.sessions.insert(ctx).await;

        self.logger
            .log_message(
                &id,
                user_agent,
                Role::Model.as_str(),
                GREETING,
                greeting.timestamp,
            )
            .await;

        info!(session_id = %id, "session opened");
        (id, greeting)
    }

    /// Full transcript of one session, with the limit flag.
    ///
    /// # Errors
    /// [`ChatError::UnknownSession`] for an id the registry does not know.
    pub async fn transcript(&self, session_id: &str) -> Result<(Vec<Message>, bool), ChatError> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| ChatError::UnknownSession(session_id.to_string()))?;
        let ctx = session.lock().await;
        Ok((ctx.transcript().to_vec(), ctx.limit_reached()))
    }

    /// Sends one user message and returns the assistant reply.
    ///
    /// The reply is always a well-formed model message: provider failures
    /// degrade to [`PROVIDER_FAILURE_TEXT`] and an empty-text success to
    /// [`EMPTY_RESPONSE_TEXT`], both with an empty source list.
    ///
    /// # Errors
    /// - [`ChatError::UnknownSession`] for an unknown id
    /// - [`ChatError::SendPending`] while a previous send awaits its reply
    /// - [`ChatError::LimitReached`] once the session spent its allowance;
    ///   no provider call is made
    /// - [`ChatError::EmptyInput`] when the text trims to nothing
    pub async fn send_message(
        &self,
        session_id: &str,
        raw_input: &str,
    ) -> Result<SendOutcome, ChatError> {
        let session = self
            .sessions
            .get(session_id)
            .await
            .ok_or_else(|| ChatError::UnknownSession(session_id.to_string()))?;

        // One in-flight send per session: a second send while the lock is
        // held is rejected, not queued.
        let Ok(mut ctx) = session.try_lock() else {
            return Err(ChatError::SendPending);
        };

        let text = sanitize_input(raw_input);
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if ctx.limit_reached() {
            return Err(ChatError::LimitReached(MAX_USER_MESSAGES));
        }

        // The history window excludes the message being sent.
        let contents = prompt::build_contents(ctx.transcript(), &text, &self.knowledge.snapshot());

        let user_message = Message::user(text);
        self.logger
            .log_message(
                &ctx.id,
                &ctx.user_agent,
                Role::User.as_str(),
                &user_message.text,
                user_message.timestamp,
            )
            .await;
        ctx.push(user_message);

        let reply = match self.backend.complete(&contents, SYSTEM_INSTRUCTION).await {
            Ok(Completion {
                text: Some(text),
                sources,
            }) => Message::model(text, sources),
            Ok(Completion { text: None, .. }) => {
                Message::model(EMPTY_RESPONSE_TEXT.to_string(), Vec::new())
            }
            Err(e) => {
                warn!(session_id = %ctx.id, error = %e, "completion failed, replying with fallback");
                Message::fallback(PROVIDER_FAILURE_TEXT.to_string())
            }
        };

        self.logger
            .log_message(
                &ctx.id,
                &ctx.user_agent,
                Role::Model.as_str(),
                &reply.text,
                reply.timestamp,
            )
            .await;
        ctx.push(reply.clone());

        Ok(SendOutcome {
            reply,
            remaining_messages: ctx.remaining_messages(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_logger::{CHAT_LOGS_KEY, ChatLog};
    use gemini_service::{GroundingSource, ProviderError, ProviderErrorKind};
    use state_store::{KeyValueStore, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubBackend {
        calls: AtomicUsize,
        completion: Completion,
    }

    impl StubBackend {
        fn answering(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                completion: Completion {
                    text: Some(text.to_string()),
                    sources: vec![GroundingSource {
                        title: "CSB".into(),
                        uri: "https://csb.gov.tr/duyuru".into(),
                    }],
                },
            }
        }

        fn empty() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                completion: Completion {
                    text: None,
                    sources: Vec::new(),
                },
            }
        }
    }

    impl CompletionBackend for StubBackend {
        async fn complete(
            &self,
            _contents: &[Content],
            _system: &str,
        ) -> Result<Completion, GeminiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.completion.clone())
        }
    }

    struct FailingBackend;

    impl CompletionBackend for FailingBackend {
        async fn complete(
            &self,
            _contents: &[Content],
            _system: &str,
        ) -> Result<Completion, GeminiError> {
            Err(ProviderError::new(ProviderErrorKind::Decode("boom".into())).into())
        }
    }

    fn engine_with<B: CompletionBackend>(
        backend: B,
        store: Arc<MemoryStore>,
    ) -> ChatEngine<B> {
        let knowledge = Arc::new(KnowledgeStore::load(store.clone()));
        let logger = Arc::new(ChatLogger::new(store, None, false));
        ChatEngine::new(backend, knowledge, logger)
    }

    fn stored_logs(store: &MemoryStore) -> Vec<ChatLog> {
        match store.get(CHAT_LOGS_KEY).unwrap() {
            Some(raw) => serde_json::from_str(&raw).unwrap(),
            None => Vec::new(),
        }
    }

    #[tokio::test]
    async fn session_opens_with_logged_greeting() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::answering("cevap"), store.clone());

        let (id, greeting) = engine.open_session("ua").await;
        assert_eq!(greeting.text, GREETING);
        assert_eq!(greeting.role, Role::Model);

        let (transcript, limit_reached) = engine.transcript(&id).await.unwrap();
        assert_eq!(transcript.len(), 1);
        assert!(!limit_reached);

        let logs = stored_logs(&store);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].conversation[0].content, GREETING);
    }

    #[tokio::test]
    async fn overlong_input_is_truncated_to_the_limit() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::answering("cevap"), store);

        let (id, _) = engine.open_session("ua").await;
        let long = "s".repeat(MAX_INPUT_CHARS + 250);
        engine.send_message(&id, &long).await.unwrap();

        let (transcript, _) = engine.transcript(&id).await.unwrap();
        let user_turn = transcript
            .iter()
            .find(|m| m.role == Role::User)
            .expect("user turn present");
        assert_eq!(user_turn.text.chars().count(), MAX_INPUT_CHARS);
    }

    #[tokio::test]
    async fn limit_blocks_sends_without_provider_calls() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::answering("cevap"), store);

        let (id, _) = engine.open_session("ua").await;
        for i in 0..MAX_USER_MESSAGES {
            let outcome = engine.send_message(&id, &format!("soru {i}")).await.unwrap();
            assert_eq!(
                outcome.remaining_messages,
                MAX_USER_MESSAGES - (i + 1)
            );
        }

        let err = engine.send_message(&id, "bir soru daha").await.unwrap_err();
        assert_eq!(err, ChatError::LimitReached(MAX_USER_MESSAGES));

        // 15 provider calls, not 16.
        assert_eq!(engine.backend.calls.load(Ordering::SeqCst), MAX_USER_MESSAGES);

        // History stays readable after the limit.
        let (transcript, limit_reached) = engine.transcript(&id).await.unwrap();
        assert!(limit_reached);
        assert_eq!(transcript.len(), 1 + MAX_USER_MESSAGES * 2);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback_and_loses_no_log() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(FailingBackend, store.clone());

        let (id, _) = engine.open_session("ua").await;
        let outcome = engine.send_message(&id, "kira yardımı").await.unwrap();

        assert_eq!(outcome.reply.text, PROVIDER_FAILURE_TEXT);
        assert_eq!(outcome.reply.role, Role::Model);
        assert!(outcome.reply.is_error);
        assert!(outcome.reply.sources.is_empty());

        let (transcript, _) = engine.transcript(&id).await.unwrap();
        let fallbacks: Vec<_> = transcript
            .iter()
            .filter(|m| m.text == PROVIDER_FAILURE_TEXT)
            .collect();
        assert_eq!(fallbacks.len(), 1);

        // Greeting + user turn + fallback all logged.
        assert_eq!(stored_logs(&store).len(), 3);
    }

    #[tokio::test]
    async fn empty_completion_degrades_to_the_no_answer_line() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::empty(), store);

        let (id, _) = engine.open_session("ua").await;
        let outcome = engine.send_message(&id, "soru").await.unwrap();

        assert_eq!(outcome.reply.text, EMPTY_RESPONSE_TEXT);
        assert!(!outcome.reply.is_error);
        assert!(outcome.reply.sources.is_empty());
    }

    #[tokio::test]
    async fn successful_reply_carries_filtered_sources() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::answering("resmi cevap"), store);

        let (id, _) = engine.open_session("ua").await;
        let outcome = engine.send_message(&id, "soru").await.unwrap();

        assert_eq!(outcome.reply.text, "resmi cevap");
        assert_eq!(outcome.reply.sources.len(), 1);
        assert_eq!(outcome.reply.sources[0].uri, "https://csb.gov.tr/duyuru");
    }

    #[tokio::test]
    async fn unknown_session_and_empty_input_are_rejected() {
        let store = Arc::new(MemoryStore::new());
        let engine = engine_with(StubBackend::answering("cevap"), store);

        assert!(matches!(
            engine.send_message("sess_missing", "soru").await,
            Err(ChatError::UnknownSession(_))
        ));

        let (id, _) = engine.open_session("ua").await;
        assert_eq!(
            engine.send_message(&id, "   ").await.unwrap_err(),
            ChatError::EmptyInput
        );
    }

    struct InspectingBackend {
        seen_parts: std::sync::Mutex<usize>,
    }

    impl CompletionBackend for InspectingBackend {
        async fn complete(
            &self,
            contents: &[Content],
            _system: &str,
        ) -> Result<Completion, GeminiError> {
            let current = contents.last().expect("current turn present");
            *self.seen_parts.lock().unwrap() = current.parts.len();
            Ok(Completion {
                text: Some("cevap".into()),
                sources: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn knowledge_base_files_reach_the_current_turn() {
        let store = Arc::new(MemoryStore::new());
        let knowledge = Arc::new(KnowledgeStore::load(store.clone()));
        knowledge.merge_provisioned(vec![state_store::UploadedFile {
            id: "f1".into(),
            name: "mevzuat.pdf".into(),
            mime: state_store::FileMime::Pdf,
            data: "UERG".into(),
            origin: state_store::FileOrigin::Provisioned,
        }]);
        let logger = Arc::new(ChatLogger::new(store, None, false));
        let engine = ChatEngine::new(
            InspectingBackend {
                seen_parts: std::sync::Mutex::new(0),
            },
            knowledge,
            logger,
        );

        let (id, _) = engine.open_session("ua").await;
        engine.send_message(&id, "soru").await.unwrap();

        // One inline part for the file plus the wrapped question.
        assert_eq!(*engine.backend.seen_parts.lock().unwrap(), 2);
    }
}
