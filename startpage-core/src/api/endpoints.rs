use super::{LinkProvider, client::RestClient, models::*};
use crate::error::StartPageError;
use crate::search::{
    NewSearchEngine, SearchEngine, SearchEngineUpdate, SearchHistoryEntry, SearchRequest,
    SearchResponse,
};
use itertools::Itertools;
use log::info;
use reqwest::Method;
use std::future::Future;

const QUICK_LINKS: &str = "api/quick-links";
const CATEGORIES: &str = "api/quick-links/categories";
const SEARCH_ENGINES: &str = "api/search-engines";
const SEARCH: &str = "api/search";
const SEARCH_HISTORY: &str = "api/search-history";

impl RestClient {
    pub async fn quick_links(
        &self,
        filter: &CategoryFilter,
    ) -> Result<Vec<LinkRecord>, StartPageError> {
        let mut url = self.endpoint(QUICK_LINKS)?;
        if let Some(category) = filter.query_value() {
            url.query_pairs_mut().append_pair("category", category);
        }

        let response = self.call(Method::GET, url, None).await?;
        let links: Vec<LinkRecord> = response.json().await?;
        info!("Loaded {} quick links for category '{}'", links.len(), filter);
        Ok(links)
    }

    pub async fn categories(&self) -> Result<Vec<String>, StartPageError> {
        let url = self.endpoint(CATEGORIES)?;
        let response = self.call(Method::GET, url, None).await?;
        let categories: Vec<String> = response.json().await?;
        Ok(categories.into_iter().unique().collect())
    }

    pub async fn create_link(&self, link: &NewLink) -> Result<LinkRecord, StartPageError> {
        link.validate()?;
        let url = self.endpoint(QUICK_LINKS)?;
        let body = serde_json::to_value(link)?;
        let response = self.call(Method::POST, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn update_link(
        &self,
        id: i64,
        update: &LinkUpdate,
    ) -> Result<LinkRecord, StartPageError> {
        update.validate()?;
        let url = self.endpoint(&format!("{}/{}", QUICK_LINKS, id))?;
        let body = serde_json::to_value(update)?;
        let response = self.call(Method::PUT, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_link(&self, id: i64) -> Result<(), StartPageError> {
        let url = self.endpoint(&format!("{}/{}", QUICK_LINKS, id))?;
        self.call(Method::DELETE, url, None).await?;
        info!("Deleted quick link {}", id);
        Ok(())
    }

    pub async fn search_engines(
        &self,
        active_only: bool,
    ) -> Result<Vec<SearchEngine>, StartPageError> {
        let mut url = self.endpoint(SEARCH_ENGINES)?;
        url.query_pairs_mut()
            .append_pair("active_only", if active_only { "true" } else { "false" });

        let response = self.call(Method::GET, url, None).await?;
        let mut engines: Vec<SearchEngine> = response.json().await?;
        engines.sort_by_key(|engine| engine.sort_order);
        Ok(engines)
    }

    pub async fn default_search_engine(&self) -> Result<SearchEngine, StartPageError> {
        let url = self.endpoint(&format!("{}/default", SEARCH_ENGINES))?;
        let response = self.call(Method::GET, url, None).await?;
        Ok(response.json().await?)
    }

    pub async fn create_search_engine(
        &self,
        engine: &NewSearchEngine,
    ) -> Result<SearchEngine, StartPageError> {
        engine.validate()?;
        let url = self.endpoint(SEARCH_ENGINES)?;
        let body = serde_json::to_value(engine)?;
        let response = self.call(Method::POST, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn update_search_engine(
        &self,
        id: i64,
        update: &SearchEngineUpdate,
    ) -> Result<SearchEngine, StartPageError> {
        update.validate()?;
        let url = self.endpoint(&format!("{}/{}", SEARCH_ENGINES, id))?;
        let body = serde_json::to_value(update)?;
        let response = self.call(Method::PUT, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// The backend clears the flag on every other engine.
    pub async fn set_default_search_engine(&self, id: i64) -> Result<SearchEngine, StartPageError> {
        self.update_search_engine(id, &SearchEngineUpdate::make_default())
            .await
    }

    pub async fn delete_search_engine(&self, id: i64) -> Result<(), StartPageError> {
        let url = self.endpoint(&format!("{}/{}", SEARCH_ENGINES, id))?;
        self.call(Method::DELETE, url, None).await?;
        info!("Deleted search engine {}", id);
        Ok(())
    }

    /// Resolve a search through the backend, which records it in the search history.
    pub async fn search(
        &self,
        query: &str,
        engine: &str,
    ) -> Result<SearchResponse, StartPageError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StartPageError::Validation(
                "Search query is empty".to_string(),
            ));
        }
        let url = self.endpoint(SEARCH)?;
        let body = serde_json::to_value(SearchRequest {
            query: query.to_string(),
            search_engine: engine.to_string(),
        })?;
        let response = self.call(Method::POST, url, Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Most recent searches first.
    pub async fn search_history(
        &self,
        limit: usize,
    ) -> Result<Vec<SearchHistoryEntry>, StartPageError> {
        let mut url = self.endpoint(SEARCH_HISTORY)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let response = self.call(Method::GET, url, None).await?;
        Ok(response.json().await?)
    }
}

impl LinkProvider for RestClient {
    fn load_links(
        &self,
        filter: &CategoryFilter,
    ) -> impl Future<Output = Result<Vec<LinkRecord>, StartPageError>> + Send {
        self.quick_links(filter)
    }

    fn load_categories(&self) -> impl Future<Output = Result<Vec<String>, StartPageError>> + Send {
        self.categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RestClient {
        RestClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn link_json(id: i64, category: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("link {}", id),
            "url": format!("https://example.com/{}", id),
            "icon": "fas fa-link",
            "color": "#007DFF",
            "category": category,
            "created_at": "2024-01-01T00:00:00"
        })
    }

    #[tokio::test]
    async fn test_quick_links_unfiltered_sends_no_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quick-links"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([link_json(1, "dev"), link_json(2, "news")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let links = client.load_links(&CategoryFilter::All).await.unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].id, 1);
        assert_eq!(links[1].category.as_deref(), Some("news"));
        let history = client.api_call_history();
        assert_eq!(history.len(), 1);
        assert!(history[0].success);
    }

    #[tokio::test]
    async fn test_quick_links_filtered_by_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quick-links"))
            .and(query_param("category", "dev"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([link_json(3, "dev")])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let links = client
            .quick_links(&CategoryFilter::parse("dev"))
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, 3);
    }

    #[tokio::test]
    async fn test_categories_are_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quick-links/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["dev", "news", "dev"])))
            .mount(&server)
            .await;

        let categories = client_for(&server).load_categories().await.unwrap();
        assert_eq!(categories, vec!["dev".to_string(), "news".to_string()]);
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/quick-links/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "not found"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.delete_link(99).await {
            Err(StartPageError::Api { status, detail }) => {
                assert_eq!(status, 404);
                assert_eq!(detail, "not found");
            }
            other => panic!("expected API error, got {:?}", other),
        }
        assert!(!client.api_call_history()[0].success);
    }

    #[tokio::test]
    async fn test_create_link_posts_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quick-links"))
            .and(body_json(json!({
                "name": "Rust",
                "url": "https://www.rust-lang.org",
                "icon": NEW_LINK_ICON,
                "color": NEW_LINK_COLOR,
                "category": NEW_LINK_CATEGORY
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(link_json(10, NEW_LINK_CATEGORY)))
            .expect(1)
            .mount(&server)
            .await;

        let created = client_for(&server)
            .create_link(&NewLink::new("Rust", "https://www.rust-lang.org"))
            .await
            .unwrap();
        assert_eq!(created.id, 10);
    }

    #[tokio::test]
    async fn test_invalid_link_is_rejected_before_sending() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let result = client.create_link(&NewLink::new("", "https://a.io")).await;
        assert!(matches!(result, Err(StartPageError::Validation(_))));
        assert!(client.api_call_history().is_empty());
    }

    #[tokio::test]
    async fn test_search_engines_sorted_by_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search-engines"))
            .and(query_param("active_only", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "name": "google", "display_name": "Google",
                 "url_template": "https://www.google.com/search?q={query}",
                 "icon": "fab fa-google", "color": "#EA4335",
                 "is_active": true, "is_default": false, "sort_order": 2},
                {"id": 1, "name": "baidu", "display_name": "百度",
                 "url_template": "https://www.baidu.com/s?wd={query}",
                 "icon": "fas fa-search", "color": "#007DFF",
                 "is_active": true, "is_default": true, "sort_order": 1}
            ])))
            .mount(&server)
            .await;

        let engines = client_for(&server).search_engines(true).await.unwrap();
        assert_eq!(engines[0].name, "baidu");
        assert_eq!(engines[1].name, "google");
    }

    #[tokio::test]
    async fn test_default_engine_and_call_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search-engines/default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "bing", "display_name": "Bing",
                "url_template": "https://www.bing.com/search?q={query}",
                "is_default": true
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let engine = client.default_search_engine().await.unwrap();
        assert_eq!(engine.name, "bing");
        assert!(engine.is_active);

        let history = client.api_call_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status_code, 200);
        assert!(history[0].success);

        client.clear_api_call_history();
        assert!(client.api_call_history().is_empty());
    }

    fn engine_json(id: i64, name: &str, is_default: bool) -> serde_json::Value {
        json!({
            "id": id, "name": name, "display_name": name.to_uppercase(),
            "url_template": format!("https://{}.example/?q={{query}}", name),
            "icon": "fas fa-search", "color": "#007DFF",
            "is_active": true, "is_default": is_default, "sort_order": id,
            "created_at": "2024-01-01T00:00:00"
        })
    }

    #[tokio::test]
    async fn test_create_search_engine_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search-engines"))
            .and(body_json(json!({
                "name": "ddg", "display_name": "DuckDuckGo",
                "url_template": "https://duckduckgo.com/?q={query}",
                "icon": "fas fa-search", "color": "#007DFF",
                "is_active": true, "is_default": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(engine_json(4, "ddg", false)))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .create_search_engine(&NewSearchEngine::new(
                "ddg",
                "DuckDuckGo",
                "https://duckduckgo.com/?q={query}",
            ))
            .await
            .unwrap();
        assert_eq!(created.id, 4);

        // template without placeholder never reaches the backend
        let result = client
            .create_search_engine(&NewSearchEngine::new("x", "X", "https://x.example/"))
            .await;
        assert!(matches!(result, Err(StartPageError::Validation(_))));
        assert_eq!(client.api_call_history().len(), 1);
    }

    #[tokio::test]
    async fn test_set_default_and_delete_search_engine() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/search-engines/2"))
            .and(body_json(json!({"is_default": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(engine_json(2, "google", true)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/search-engines/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let engine = client.set_default_search_engine(2).await.unwrap();
        assert!(engine.is_default);
        client.delete_search_engine(3).await.unwrap();
    }

    #[tokio::test]
    async fn test_backend_search_and_history() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .and(body_json(json!({"query": "rust", "search_engine": "google"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "search_url": "https://www.google.com/search?q=rust",
                "search_engine": "Google",
                "query": "rust"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/search-history"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 9, "query": "rust", "search_engine": "google",
                 "created_at": "2024-01-02T00:00:00"},
                {"id": 8, "query": "iced", "search_engine": "baidu",
                 "created_at": "2024-01-01T00:00:00"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.search("  rust ", "google").await.unwrap();
        assert_eq!(response.search_url, "https://www.google.com/search?q=rust");
        assert_eq!(response.search_engine, "Google");

        assert!(matches!(
            client.search(" ", "google").await,
            Err(StartPageError::Validation(_))
        ));

        let history = client.search_history(5).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].query, "rust");
    }

    #[tokio::test]
    async fn test_search_with_unknown_engine_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "搜索引擎未找到"})))
            .mount(&server)
            .await;

        let result = client_for(&server).search("rust", "nope").await;
        match result {
            Err(StartPageError::Api { status, detail }) => {
                assert_eq!(status, 404);
                assert_eq!(detail, "搜索引擎未找到");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }
}
