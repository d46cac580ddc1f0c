//! GenerateReportHandler - final evaluation report of an interview.
//!
//! Sequence: lock → history check → model → metadata extraction and report
//! sanitization → rendering → mark completed → commit. Rendering happens
//! before the completion is recorded, so a failed render leaves the
//! conversation untouched and the request can be retried.

use std::sync::Arc;
use std::time::Instant;

use crate::config::InterviewConfig;
use crate::domain::foundation::{ConversationId, UserId};
use crate::domain::interview::{InterviewMetadata, MetadataExtractor};
use crate::domain::sanitization::{ReportFacts, ReportSanitizer, SanitizedReport};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, Message, RenderedDocument, ReportDocument,
    ReportRenderer, RequestMetadata, TurnStore,
};

use super::errors::ExchangeError;
use super::history::build_history;
use super::prompts::{INTERVIEWER_SYSTEM_PROMPT, REPORT_INSTRUCTION};

/// Command to generate the report of a conversation.
#[derive(Debug, Clone)]
pub struct GenerateReportCommand {
    pub user_id: UserId,
    pub conversation_id: ConversationId,
    /// Name printed in the report header.
    pub candidate_name: String,
}

/// Rendered report plus the values it was built from.
#[derive(Debug, Clone)]
pub struct GenerateReportResult {
    pub document: RenderedDocument,
    pub report: SanitizedReport,
    pub facts: ReportFacts,
    pub metadata: InterviewMetadata,
    /// Suggested download name, e.g. `informe_entrevista_7_20261019.pdf`.
    pub filename: String,
}

/// Handler for report-generation exchanges.
pub struct GenerateReportHandler {
    store: Arc<dyn TurnStore>,
    ai_provider: Arc<dyn AIProvider>,
    renderer: Arc<dyn ReportRenderer>,
    extractor: MetadataExtractor,
    sanitizer: ReportSanitizer,
    config: InterviewConfig,
}

impl GenerateReportHandler {
    pub fn new(
        store: Arc<dyn TurnStore>,
        ai_provider: Arc<dyn AIProvider>,
        renderer: Arc<dyn ReportRenderer>,
        config: InterviewConfig,
    ) -> Self {
        Self {
            store,
            ai_provider,
            renderer,
            extractor: MetadataExtractor::new(config.extraction_window),
            sanitizer: ReportSanitizer::new(),
            config,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateReportCommand,
    ) -> Result<GenerateReportResult, ExchangeError> {
        let started = Instant::now();

        // 1. Lock and load
        let mut tx = self.store.begin().await?;
        let conversation = tx
            .lock_conversation(cmd.conversation_id, cmd.user_id)
            .await?
            .ok_or(ExchangeError::ConversationNotFound(cmd.conversation_id))?;

        let turns = tx
            .list_turns(conversation.id, self.config.report_history_window)
            .await?;
        if turns.len() < self.config.report_min_turns {
            return Err(ExchangeError::InsufficientHistory {
                required: self.config.report_min_turns,
                actual: turns.len(),
            });
        }

        // 2. Ask the model for the report
        let mut history = build_history(&turns, self.config.report_history_window);
        history.push(Message::user(REPORT_INSTRUCTION));

        let request = CompletionRequest::new(RequestMetadata::traced(cmd.user_id, conversation.id))
            .with_system_prompt(INTERVIEWER_SYSTEM_PROMPT)
            .with_messages(history)
            .with_max_tokens(self.config.report_max_tokens)
            .with_temperature(self.config.temperature)
            .with_top_p(self.config.top_p);

        let response = self.ai_provider.complete(request).await?;
        if response.content.trim().is_empty() {
            return Err(AIError::parse("empty report").into());
        }

        // 3. Recover interview parameters and clean the narrative
        let metadata = self.extractor.extract(&turns);
        let facts = ReportFacts::new(conversation.created_at.format_long_es(), &metadata);
        let report = self.sanitizer.sanitize(&response.content, &facts, &turns);

        // 4. Render
        let document = ReportDocument {
            candidate_name: cmd.candidate_name,
            facts: facts.clone(),
            report: report.clone(),
        };
        let rendered = match self.renderer.render(&document).await {
            Ok(rendered) => rendered,
            Err(error) => {
                tracing::error!(
                    conversation_id = %conversation.id,
                    error = %error,
                    "Report rendering failed"
                );
                return Err(ExchangeError::RenderFailure {
                    error,
                    report: Box::new(report),
                });
            }
        };

        // 5. Close the interview
        tx.mark_completed(conversation.id).await?;
        tx.commit().await?;

        tracing::info!(
            conversation_id = %conversation.id,
            transcript_turns = turns.len(),
            rating = ?report.rating,
            metadata_complete = metadata.is_complete(),
            document_bytes = rendered.bytes.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Report generated"
        );

        let filename = format!(
            "informe_entrevista_{}_{}.{}",
            conversation.id,
            conversation.created_at.format_compact(),
            rendered.extension
        );

        Ok(GenerateReportResult {
            document: rendered,
            report,
            facts,
            metadata,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::memory::InMemoryConversationStore;
    use crate::domain::interview::{ConversationStatus, EmployabilityRating, Sender};
    use crate::ports::{ConversationRepository, MessageRole, RenderError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const RAW_REPORT: &str = "\
## DATOS DE LA ENTREVISTA
- Candidato: [nombre del candidato]
- Fecha: [fecha actual]

## Valoración general
Buen desempeño en el rol [rol proporcionado por el candidato].

## Ortografía
Ejemplos de errores: \"aprendizage\" y \"haiga\".

Nivel de Empleabilidad: Bueno";

    #[derive(Default)]
    struct RecordingRenderer {
        fail: bool,
        documents: Mutex<Vec<ReportDocument>>,
    }

    #[async_trait]
    impl ReportRenderer for RecordingRenderer {
        async fn render(&self, document: &ReportDocument) -> Result<RenderedDocument, RenderError> {
            self.documents.lock().unwrap().push(document.clone());
            if self.fail {
                return Err(RenderError::ToolNotFound("pandoc".into()));
            }
            Ok(RenderedDocument::new(document.report.text.clone().into_bytes(), "text/plain", "txt"))
        }
    }

    fn owner() -> UserId {
        UserId::new(1).unwrap()
    }

    async fn seeded_store(candidate_turns: &[&str]) -> (InMemoryConversationStore, ConversationId) {
        let store = InMemoryConversationStore::new();
        let conversation = store.create(owner(), "Entrevista").await.unwrap();
        let mut tx = store.begin().await.unwrap();
        tx.lock_conversation(conversation.id, owner()).await.unwrap();
        for content in candidate_turns {
            tx.create_turn(conversation.id, Sender::Model, "Siguiente pregunta")
                .await
                .unwrap();
            tx.create_turn(conversation.id, Sender::User, content).await.unwrap();
        }
        tx.commit().await.unwrap();
        (store, conversation.id)
    }

    fn handler(
        store: &InMemoryConversationStore,
        ai: &MockAIProvider,
        renderer: Arc<RecordingRenderer>,
    ) -> GenerateReportHandler {
        GenerateReportHandler::new(
            Arc::new(store.clone()),
            Arc::new(ai.clone()),
            renderer,
            InterviewConfig::default(),
        )
    }

    fn command(id: ConversationId) -> GenerateReportCommand {
        GenerateReportCommand {
            user_id: owner(),
            conversation_id: id,
            candidate_name: "Ana".to_string(),
        }
    }

    const TRANSCRIPT: [&str; 4] = [
        "Junior",
        "Estoy en el ciclo de DAW, FP Superior",
        "Una entrevista corta",
        "Me gusta el aprendizage continuo",
    ];

    #[tokio::test]
    async fn produces_sanitized_report_and_completes_conversation() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new().with_response(RAW_REPORT);
        let renderer = Arc::new(RecordingRenderer::default());

        let result = handler(&store, &ai, renderer.clone())
            .handle(command(id))
            .await
            .unwrap();

        assert_eq!(result.report.rating, Some(EmployabilityRating::Bueno));
        assert!(!result.report.text.contains("DATOS DE LA ENTREVISTA"));
        assert!(!result.report.text.contains('['));
        assert!(!result.report.text.to_lowercase().contains("empleabilidad"));
        assert!(result.report.text.contains("Junior"));
        // "aprendizage" is in the transcript, "haiga" is not
        assert!(!result.report.text.contains("haiga"));

        assert_eq!(result.facts.cycle, "DAW - Desarrollo de Aplicaciones Web");
        assert_eq!(result.facts.academic_level, "FP Superior");
        assert_eq!(result.facts.duration, "Corta");
        assert!(result.filename.starts_with(&format!("informe_entrevista_{}_", id)));
        assert!(result.filename.ends_with(".txt"));

        let documents = renderer.documents.lock().unwrap();
        assert_eq!(documents[0].candidate_name, "Ana");

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status(), ConversationStatus::Completed);
        assert!(stored.completed_at().is_some());
    }

    #[tokio::test]
    async fn request_carries_report_instruction_and_budget() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new().with_response(RAW_REPORT);

        handler(&store, &ai, Arc::new(RecordingRenderer::default()))
            .handle(command(id))
            .await
            .unwrap();

        let call = ai.last_call().unwrap();
        assert_eq!(call.max_tokens, Some(2500));
        assert_eq!(call.temperature, Some(0.7));
        assert_eq!(call.top_p, Some(0.9));
        let last = call.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, REPORT_INSTRUCTION);
        assert_eq!(call.messages.len(), TRANSCRIPT.len() * 2 + 1);
    }

    #[tokio::test]
    async fn short_history_is_insufficient() {
        let (store, id) = seeded_store(&["Junior"]).await;
        let ai = MockAIProvider::new();

        let err = handler(&store, &ai, Arc::new(RecordingRenderer::default()))
            .handle(command(id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExchangeError::InsufficientHistory { required: 5, actual: 2 }
        ));
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn render_failure_keeps_report_and_leaves_conversation_active() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new().with_response(RAW_REPORT);
        let renderer = Arc::new(RecordingRenderer {
            fail: true,
            ..Default::default()
        });

        let err = handler(&store, &ai, renderer).handle(command(id)).await.unwrap_err();

        match err {
            ExchangeError::RenderFailure { report, .. } => {
                assert_eq!(report.rating, Some(EmployabilityRating::Bueno));
            }
            other => panic!("expected RenderFailure, got {other:?}"),
        }
        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status(), ConversationStatus::Active);
    }

    #[tokio::test]
    async fn model_failure_leaves_conversation_active() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 60 });

        let err = handler(&store, &ai, Arc::new(RecordingRenderer::default()))
            .handle(command(id))
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::ModelUnavailable(AIError::Timeout { .. })));
        assert_eq!(store.get(id).await.unwrap().status(), ConversationStatus::Active);
    }

    #[tokio::test]
    async fn regeneration_keeps_first_completion_time() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new()
            .with_response(RAW_REPORT)
            .with_response(RAW_REPORT);
        let h = handler(&store, &ai, Arc::new(RecordingRenderer::default()));

        h.handle(command(id)).await.unwrap();
        let first = store.get(id).await.unwrap().completed_at();
        h.handle(command(id)).await.unwrap();
        let second = store.get(id).await.unwrap().completed_at();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn foreign_conversation_is_not_found() {
        let (store, id) = seeded_store(&TRANSCRIPT).await;
        let ai = MockAIProvider::new();
        let cmd = GenerateReportCommand {
            user_id: UserId::new(2).unwrap(),
            ..command(id)
        };

        let err = handler(&store, &ai, Arc::new(RecordingRenderer::default()))
            .handle(cmd)
            .await
            .unwrap_err();

        assert!(matches!(err, ExchangeError::ConversationNotFound(_)));
    }
}
