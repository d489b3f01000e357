//! Query controller: validate, submit, render the answer and its sources.
use crate::{format_es_date, Effect};

pub const EMPTY_QUERY_ERROR: &str = "Por favor, introduce una pregunta.";
pub const GENERIC_SERVER_ERROR: &str = "Ocurrió un error en el servidor.";
pub const NO_SOURCES_PLACEHOLDER: &str = "No se utilizaron fuentes específicas para esta respuesta.";
pub const READ_MORE_LABEL: &str = "Leer más";

const UNKNOWN_MEDIUM: &str = "sin medio";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceDoc {
    pub title: String,
    pub content: String,
    /// ISO date or timestamp as sent by the server.
    pub date: String,
    pub medium_id: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    pub answer_text: String,
    pub sources: Vec<SourceDoc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// Non-success status; `detail` comes from the JSON error body if any.
    ServerRejected { detail: Option<String> },
    /// The request never produced a usable response.
    Transport(String),
}

impl QueryFailure {
    fn message(&self) -> String {
        match self {
            QueryFailure::ServerRejected {
                detail: Some(detail),
            } if !detail.is_empty() => detail.clone(),
            QueryFailure::ServerRejected { .. } => GENERIC_SERVER_ERROR.to_string(),
            QueryFailure::Transport(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCardView {
    pub title: String,
    pub content: String,
    pub date_label: String,
    pub medium_label: String,
    pub link_label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcesView {
    Cards(Vec<SourceCardView>),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    pub text: String,
    pub sources: SourcesView,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryView {
    pub input: String,
    pub results_visible: bool,
    pub loader_visible: bool,
    pub error: Option<String>,
    /// `None` while the response container is hidden.
    pub answer: Option<AnswerView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct QueryController {
    view: QueryView,
    pending: usize,
}

impl QueryController {
    pub(crate) fn set_input(&mut self, text: String) -> bool {
        if self.view.input == text {
            return false;
        }
        self.view.input = text;
        true
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending > 0
    }

    /// Empty input is reported inline and produces no effect.
    pub(crate) fn submit(&mut self) -> Option<Effect> {
        let question = self.view.input.trim().to_string();
        if question.is_empty() {
            self.view.error = Some(EMPTY_QUERY_ERROR.to_string());
            return None;
        }

        self.view.results_visible = true;
        self.view.answer = None;
        self.view.error = None;
        self.view.loader_visible = true;
        self.pending += 1;
        Some(Effect::SubmitQuery { question })
    }

    pub(crate) fn answered(&mut self, result: &QueryResult) {
        self.pending = self.pending.saturating_sub(1);
        self.view.loader_visible = false;
        self.view.answer = Some(AnswerView {
            text: result.answer_text.clone(),
            sources: sources_view(&result.sources),
        });
    }

    pub(crate) fn failed(&mut self, failure: &QueryFailure) {
        self.pending = self.pending.saturating_sub(1);
        self.view.loader_visible = false;
        self.view.error = Some(failure.message());
    }

    pub(crate) fn view(&self) -> QueryView {
        self.view.clone()
    }
}

fn sources_view(sources: &[SourceDoc]) -> SourcesView {
    if sources.is_empty() {
        return SourcesView::Placeholder(NO_SOURCES_PLACEHOLDER);
    }
    SourcesView::Cards(
        sources
            .iter()
            .map(|source| SourceCardView {
                title: source.title.clone(),
                content: source.content.clone(),
                date_label: format_es_date(&source.date),
                medium_label: source
                    .medium_id
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_MEDIUM.to_string()),
                link_label: READ_MORE_LABEL,
                url: source.url.clone(),
            })
            .collect(),
    )
}
