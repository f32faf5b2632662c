//! HTTP gateway implementation backed by reqwest

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error, info, warn};
use reqwest::{multipart, Client, Response, StatusCode};

use chronicle_core::{
    AgentInvokeRequest, AgentResponseDto, ApiErrorDto, ChatTurn, PlotDto, PlotRecord, PreviewDto,
    PreviewTable, ProjectStateDto, UploadOutcome, UploadResponseDto,
};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::gateway_trait::LineageGateway;

const UPLOAD_EXTENSION: &str = ".csv";

/// Production gateway speaking JSON to the lineage backend.
#[derive(Debug, Clone)]
pub struct HttpLineageGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpLineageGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Turn a non-2xx response into a typed server error, salvaging the
    /// message body when it parses.
    async fn server_error(response: Response) -> GatewayError {
        let status = response.status().as_u16();
        let message = match response.json::<ApiErrorDto>().await {
            Ok(body) => body.message().unwrap_or("no error body").to_string(),
            Err(_) => "no error body".to_string(),
        };
        GatewayError::Server { status, message }
    }
}

#[async_trait]
impl LineageGateway for HttpLineageGateway {
    async fn fetch_state(&self) -> Result<ProjectStateDto> {
        let url = self.url("/api/project/state");
        debug!("fetching project state from {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let err = Self::server_error(response).await;
            warn!("project state fetch failed: {err}");
            return Err(err);
        }
        let state = response.json::<ProjectStateDto>().await?;
        debug!(
            "project state: {} nodes, {} edges",
            state.nodes.len(),
            state.edges.len()
        );
        Ok(state)
    }

    async fn fetch_preview(&self, node_id: &str) -> Result<PreviewTable> {
        let url = self.url(&format!("/api/dataframe/{node_id}/preview"));
        debug!("fetching preview for node {node_id}");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound {
                node_id: node_id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }

        // The preview endpoint reports a vanished node as an error body,
        // not a status code, so fall back to the error shape on a parse
        // miss.
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        match serde_json::from_slice::<PreviewDto>(&body) {
            Ok(dto) => Ok(dto.into()),
            Err(_) => match serde_json::from_slice::<ApiErrorDto>(&body) {
                Ok(err_body) if err_body.message().is_some() => Err(GatewayError::NotFound {
                    node_id: node_id.to_string(),
                }),
                _ => Err(GatewayError::Server {
                    status,
                    message: "unexpected preview payload".to_string(),
                }),
            },
        }
    }

    async fn invoke_agent(&self, input: &str, _history: &[ChatTurn]) -> Result<AgentResponseDto> {
        let url = self.url("/api/agent/invoke");
        info!("invoking agent");

        let request = AgentInvokeRequest {
            input: input.to_string(),
        };
        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let err = Self::server_error(response).await;
            error!("agent invocation failed: {err}");
            return Err(err);
        }
        let reply = response.json::<AgentResponseDto>().await?;
        debug!("agent replied with {} thoughts", reply.thoughts.len());
        Ok(reply)
    }

    async fn upload_file(&self, bytes: Bytes, filename: &str) -> Result<UploadOutcome> {
        if !filename.to_ascii_lowercase().ends_with(UPLOAD_EXTENSION) {
            return Err(GatewayError::Validation(format!(
                "only {UPLOAD_EXTENSION} files are accepted, got '{filename}'"
            )));
        }

        let url = self.url("/api/upload");
        info!("uploading '{filename}' ({} bytes)", bytes.len());

        let part = multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }

        // A malformed file comes back as a 200 with an error body.
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        match serde_json::from_slice::<UploadResponseDto>(&body) {
            Ok(dto) => Ok(UploadOutcome {
                message: dto.message,
            }),
            Err(_) => match serde_json::from_slice::<ApiErrorDto>(&body) {
                Ok(err_body) if err_body.message().is_some() => Err(GatewayError::Validation(
                    err_body.message().unwrap_or_default().to_string(),
                )),
                _ => Err(GatewayError::Server {
                    status,
                    message: "unexpected upload payload".to_string(),
                }),
            },
        }
    }

    async fn fetch_plots(&self) -> Result<Vec<PlotRecord>> {
        let url = self.url("/api/project/plots");
        debug!("fetching plots");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::server_error(response).await);
        }
        let plots = response.json::<Vec<PlotDto>>().await?;
        Ok(plots.into_iter().map(PlotRecord::from).collect())
    }
}
