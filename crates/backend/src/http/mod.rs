//! `reqwest` adapter for the LegalMind REST API.

mod mapping;
mod wire;

use async_trait::async_trait;
use legal_core::model::{
    AnalysisType, CaseAnalysis, CaseRecord, ChatReply, ChatSession, ChatTopic, LearningStats,
    LegalArea, LessonId, Module, ModuleId, ModulePatch, ProgressMap, SavedAnalysis,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{CaseBackend, ChatBackend, LearningBackend, SearchBackend, SearchKind};
use crate::config::BackendConfig;
use crate::error::BackendError;

pub use mapping::parse_timestamp;

use wire::{
    AnalysesResponse, AnalyzeRequest, AnalyzeResponse, AreasResponse, CasesResponse, ChatRequest,
    ChatResponseDto, ModuleContentResponse, ModulesResponse, ProgressResponse, SearchResponse,
    SessionsResponse, StatsDto, TopicsResponse, UpdateProgressRequest,
};

#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().build()?;
        tracing::debug!(base_url = %config.base_url(), "creating HttpBackend");
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Append path segments to the base URL. A trailing `""` keeps a trailing slash.
    fn url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.api_key() {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let req = self.authorize(self.client.get(url));
        Self::read_json(req).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.authorize(self.client.post(url).json(body));
        Self::read_json(req).await
    }

    async fn read_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, BackendError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, "request failed");
            return Err(if status == StatusCode::NOT_FOUND && body.trim().is_empty() {
                BackendError::NotFound
            } else {
                BackendError::from_response_body(status, &body)
            });
        }
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LearningBackend for HttpBackend {
    /// GET /learning/modules
    #[tracing::instrument(level = "debug", skip(self))]
    async fn catalog(&self) -> Result<Vec<Module>, BackendError> {
        let url = self.url(&["learning", "modules"])?;
        tracing::debug!(%url, "GET modules");
        let parsed: ModulesResponse = self.get_json(url).await?;
        Ok(mapping::catalog_from_dto(parsed.modules))
    }

    /// GET /learning/modules/{id}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn module_content(&self, id: &ModuleId) -> Result<ModulePatch, BackendError> {
        let url = self.url(&["learning", "modules", id.as_str()])?;
        tracing::debug!(%url, "GET module content");
        let parsed: ModuleContentResponse = self.get_json(url).await?;
        Ok(mapping::patch_from_dto(parsed.into_inner()))
    }

    /// GET /learning/progress
    #[tracing::instrument(level = "debug", skip(self))]
    async fn progress(&self) -> Result<ProgressMap, BackendError> {
        let url = self.url(&["learning", "progress"])?;
        tracing::debug!(%url, "GET progress");
        let parsed: ProgressResponse = self.get_json(url).await?;
        Ok(mapping::progress_from_dto(parsed))
    }

    /// GET /learning/stats
    #[tracing::instrument(level = "debug", skip(self))]
    async fn stats(&self) -> Result<LearningStats, BackendError> {
        let url = self.url(&["learning", "stats"])?;
        tracing::debug!(%url, "GET stats");
        let parsed: StatsDto = self.get_json(url).await?;
        Ok(mapping::stats_from_dto(parsed))
    }

    /// POST /learning/progress
    #[tracing::instrument(level = "debug", skip(self))]
    async fn update_progress(
        &self,
        module: &ModuleId,
        lesson: &LessonId,
        completed: bool,
    ) -> Result<(), BackendError> {
        let url = self.url(&["learning", "progress"])?;
        tracing::debug!(%url, "POST progress");
        let body = UpdateProgressRequest {
            module_id: module.as_str(),
            lesson_id: lesson.as_str(),
            completed,
        };
        let _ack: serde_json::Value = self.post_json(url, &body).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    /// POST /chat/
    #[tracing::instrument(level = "debug", skip(self, message))]
    async fn send_message(
        &self,
        message: &str,
        topic: Option<&str>,
    ) -> Result<ChatReply, BackendError> {
        let url = self.url(&["chat", ""])?;
        tracing::debug!(%url, chars = message.chars().count(), "POST chat");
        let parsed: ChatResponseDto = self
            .post_json(url, &ChatRequest { message, topic })
            .await?;
        Ok(mapping::chat_reply_from_dto(parsed))
    }

    /// GET /chat/topics
    #[tracing::instrument(level = "debug", skip(self))]
    async fn topics(&self) -> Result<Vec<ChatTopic>, BackendError> {
        let url = self.url(&["chat", "topics"])?;
        tracing::debug!(%url, "GET chat topics");
        let parsed: TopicsResponse = self.get_json(url).await?;
        Ok(parsed.topics.into_iter().map(mapping::topic_from_dto).collect())
    }

    /// GET /chat/sessions
    #[tracing::instrument(level = "debug", skip(self))]
    async fn sessions(&self) -> Result<Vec<ChatSession>, BackendError> {
        let url = self.url(&["chat", "sessions"])?;
        tracing::debug!(%url, "GET chat sessions");
        let parsed: SessionsResponse = self.get_json(url).await?;
        Ok(parsed
            .sessions
            .into_iter()
            .map(mapping::session_from_dto)
            .collect())
    }
}

#[async_trait]
impl CaseBackend for HttpBackend {
    /// POST /cases/analyze
    #[tracing::instrument(level = "debug", skip(self, case_text))]
    async fn analyze(
        &self,
        case_text: &str,
        analysis_type: AnalysisType,
    ) -> Result<CaseAnalysis, BackendError> {
        let url = self.url(&["cases", "analyze"])?;
        tracing::debug!(%url, %analysis_type, "POST analyze");
        let body = AnalyzeRequest {
            case_text,
            analysis_type: analysis_type.as_str(),
        };
        let AnalyzeResponse(fields) = self.post_json(url, &body).await?;
        Ok(mapping::analysis_from_map(analysis_type, fields))
    }

    /// GET /cases/search?q=
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<CaseRecord>, BackendError> {
        let mut url = self.url(&["cases", "search"])?;
        url.query_pairs_mut().append_pair("q", query);
        tracing::debug!(%url, "GET case search");
        let parsed: CasesResponse = self.get_json(url).await?;
        Ok(parsed.cases.into_iter().map(mapping::case_from_dto).collect())
    }

    /// GET /cases/area/{area}
    #[tracing::instrument(level = "debug", skip(self))]
    async fn by_area(&self, area: &str) -> Result<Vec<CaseRecord>, BackendError> {
        let url = self.url(&["cases", "area", area])?;
        tracing::debug!(%url, "GET cases by area");
        let parsed: CasesResponse = self.get_json(url).await?;
        Ok(parsed.cases.into_iter().map(mapping::case_from_dto).collect())
    }

    /// GET /cases/areas
    #[tracing::instrument(level = "debug", skip(self))]
    async fn legal_areas(&self) -> Result<Vec<LegalArea>, BackendError> {
        let url = self.url(&["cases", "areas"])?;
        tracing::debug!(%url, "GET legal areas");
        let parsed: AreasResponse = self.get_json(url).await?;
        Ok(parsed.areas.into_iter().map(mapping::area_from_dto).collect())
    }

    /// GET /cases/analyses
    #[tracing::instrument(level = "debug", skip(self))]
    async fn user_analyses(&self) -> Result<Vec<SavedAnalysis>, BackendError> {
        let url = self.url(&["cases", "analyses"])?;
        tracing::debug!(%url, "GET user analyses");
        let parsed: AnalysesResponse = self.get_json(url).await?;
        Ok(parsed
            .analyses
            .into_iter()
            .map(mapping::saved_analysis_from_dto)
            .collect())
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    /// GET /search/?q=&type=
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<Vec<serde_json::Value>, BackendError> {
        let mut url = self.url(&["search", ""])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("type", kind.as_str());
        tracing::debug!(%url, "GET search");
        let parsed: SearchResponse = self.get_json(url).await?;
        Ok(parsed.into_results())
    }
}
