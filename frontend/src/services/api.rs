//! HTTP client for the fund referential REST API.
//!
//! Every method builds its URL from an [`Endpoint`], sends it with
//! `gloo-net` and hands the JSON body to the matching `fundref` parser, so
//! views only ever see normalized records.

use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::use_context;
use serde_json::Value;

use fundref::{
    error_detail, parse_fund, parse_fund_page, parse_hierarchy, parse_managed_funds,
    parse_management_entities, parse_search_results, parse_subtree, ApiConfig, ApiError,
    ApiResult, Depth, Endpoint, Fund, FundSummary, ManagementEntity, Method, Page, Subtree,
    MANAGED_FUNDS_LIMIT,
};

/// REST client bound to one API base URL.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: &Endpoint) -> String {
        self.config.url(endpoint)
    }

    // =========================================================================
    // Typed calls
    // =========================================================================

    /// `GET /funds/?skip=&limit=`
    pub async fn list_funds(&self, skip: usize, limit: usize) -> ApiResult<Page<Fund>> {
        let body = self.get_json(&Endpoint::ListFunds { skip, limit }).await?;
        Ok(parse_fund_page(&body)?)
    }

    /// `GET /funds/{id}`
    pub async fn fund(&self, id: &str) -> ApiResult<Fund> {
        let body = self.get_json(&Endpoint::Fund { id: id.to_string() }).await?;
        Ok(parse_fund(&body)?)
    }

    /// `GET /funds/search?q=`
    pub async fn search(&self, query: &str) -> ApiResult<Vec<FundSummary>> {
        let endpoint = Endpoint::Search {
            query: query.to_string(),
        };
        let body = self.get_json(&endpoint).await?;
        Ok(parse_search_results(&body)?)
    }

    /// Subfunds of `id` down to `depth` levels.
    ///
    /// Uses the children route. Servers that only expose
    /// `GET /funds/{id}/hierarchy` answer it with 404, in which case that
    /// route is used instead and its rows are normalized the same way.
    pub async fn subtree(&self, id: &str, depth: Depth) -> ApiResult<Subtree> {
        let children = Endpoint::HierarchyChildren {
            id: id.to_string(),
            depth,
        };
        match self.get_json(&children).await {
            Ok(body) => Ok(parse_subtree(&body, depth)?),
            Err(ApiError::Status { status: 404, .. }) => {
                log::warn!("Children route missing for {}, using hierarchy route", id);
                let endpoint = Endpoint::Hierarchy {
                    id: id.to_string(),
                    depth,
                };
                let body = self.get_json(&endpoint).await?;
                Ok(parse_hierarchy(&body, id, depth)?)
            }
            Err(err) => Err(err),
        }
    }

    /// First page of funds administered by a management entity.
    pub async fn managed_funds(&self, mgmt_id: &str) -> ApiResult<Page<Fund>> {
        let endpoint = Endpoint::ManagedBy {
            mgmt_id: mgmt_id.to_string(),
            page: 1,
            limit: MANAGED_FUNDS_LIMIT,
        };
        let body = self.get_json(&endpoint).await?;
        Ok(parse_managed_funds(&body)?)
    }

    /// `GET /management/?skip=&limit=`
    pub async fn management_entities(
        &self,
        skip: usize,
        limit: usize,
    ) -> ApiResult<Page<ManagementEntity>> {
        let body = self
            .get_json(&Endpoint::ListManagement { skip, limit })
            .await?;
        Ok(parse_management_entities(&body)?)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Request for an endpoint, with the endpoint's own method.
    pub fn request(&self, endpoint: &Endpoint) -> RequestBuilder {
        let url = self.url(endpoint);
        log::debug!("{:?} {}", endpoint.method(), url);
        match endpoint.method() {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
        }
    }

    async fn get_json(&self, endpoint: &Endpoint) -> ApiResult<Value> {
        let response = self
            .request(endpoint)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_json(response).await
    }
}

/// Client provided by the application root, or one built from the build
/// configuration when rendered outside of it.
pub fn use_api_client() -> ApiClient {
    use_context::<ApiClient>().unwrap_or_else(|| {
        log::warn!("No ApiClient in context, using build configuration");
        ApiClient::new(crate::config::api_config())
    })
}

/// Turn a response into its JSON body, or into an error carrying the
/// server's `detail` message.
pub(crate) async fn read_json(response: Response) -> ApiResult<Value> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status,
            detail: error_detail(&body),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_use_configured_base() {
        let client = ApiClient::new(ApiConfig::new("https://api.example.com/"));
        assert_eq!(
            client.url(&Endpoint::Fund { id: "F 1".into() }),
            "https://api.example.com/funds/F%201"
        );
        assert_eq!(
            client.url(&Endpoint::ListFunds { skip: 20, limit: 10 }),
            "https://api.example.com/funds/?skip=20&limit=10"
        );
    }

    #[test]
    fn test_default_client_targets_localhost() {
        let client = ApiClient::default();
        assert_eq!(client.config().base_url(), "http://localhost:8000");
    }
}
