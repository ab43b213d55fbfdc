//! DataProvider
//!
//! Owns the grid's data source together with its filter, sort and page state,
//! and turns that state into one page of records.
//!
//! ## Fetch lifecycle
//!
//! ```text
//! begin_fetch()          snapshot state + generation
//!       │
//!       ▼
//! FetchTicket::run()     local slice (already computed) or remote GET
//!       │
//!       ▼
//! complete_fetch()       apply if generation still current, else Stale
//! ```
//!
//! Every setter bumps the generation, so a response that was requested for an
//! older state is discarded instead of overwriting newer data.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::filter::FilterSet;
use super::pagination::{PageSize, compute_total_pages, page_range};
use super::record::{Record, compare_values, resolve_scalar};
use super::sort::{SortState, SortType};
use crate::domain::config::GridConfig;
use crate::error::{Error, Result};
use crate::services::transport::{HttpTransport, RemotePage, RemoteQuery, Transport};

/// How the sort column and direction are encoded in one request parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortFormat {
    /// `name asc` / `name desc`
    #[default]
    Spaced,
    /// `name` / `-name`
    Signed,
}

impl SortFormat {
    pub fn format(&self, column: &str, sort_type: SortType) -> String {
        match (self, sort_type) {
            (SortFormat::Spaced, sort_type) => format!("{column} {}", sort_type.as_str()),
            (SortFormat::Signed, SortType::Asc) => column.to_string(),
            (SortFormat::Signed, SortType::Desc) => format!("-{column}"),
        }
    }
}

/// Request parameter names for a remote source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    pub page_param: String,
    pub page_size_param: String,
    pub sort_param: String,
    pub sort_format: SortFormat,
    /// Sent with every request, after the grid's own parameters
    pub additional: BTreeMap<String, String>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            page_size_param: "pageSize".to_string(),
            sort_param: "sort".to_string(),
            sort_format: SortFormat::Spaced,
            additional: BTreeMap::new(),
        }
    }
}

/// Remote endpoint descriptor
#[derive(Clone)]
pub struct RemoteSource {
    pub url: String,
    pub params: RequestParams,
    pub transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("url", &self.url)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Where the grid's rows come from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// Static collection, filtered, sorted and sliced in place
    Local(Vec<Record>),
    /// Endpoint that filters, sorts and pages server-side
    Remote(RemoteSource),
}

/// Result of applying a fetch outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Applied,
    /// Requested for an older state; data left untouched
    Stale,
}

enum FetchWork {
    Ready(Result<RemotePage>),
    Remote {
        transport: Arc<dyn Transport>,
        query: RemoteQuery,
    },
}

/// A fetch captured from the provider state at one generation
pub struct FetchTicket {
    generation: u64,
    work: FetchWork,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The request this ticket will issue, for remote sources
    pub fn query(&self) -> Option<&RemoteQuery> {
        match &self.work {
            FetchWork::Remote { query, .. } => Some(query),
            FetchWork::Ready(_) => None,
        }
    }

    /// Resolve the page. Does not touch the provider.
    pub async fn run(self) -> FetchOutcome {
        let result = match self.work {
            FetchWork::Ready(result) => result,
            FetchWork::Remote { transport, query } => transport.get(query).await,
        };
        FetchOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// A resolved fetch waiting to be applied
pub struct FetchOutcome {
    generation: u64,
    result: Result<RemotePage>,
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Data provider for the grid
#[derive(Debug)]
pub struct DataProvider {
    source: DataSource,
    filters: FilterSet,
    sort: SortState,
    page_index: usize,
    page_size: PageSize,
    records: Vec<Record>,
    total_count: usize,
    generation: u64,
}

impl DataProvider {
    pub fn new(source: DataSource, page_size: PageSize) -> Self {
        Self {
            source,
            filters: FilterSet::new(),
            sort: SortState::default(),
            page_index: 1,
            page_size,
            records: Vec::new(),
            total_count: 0,
            generation: 0,
        }
    }

    /// Provider over a static collection
    pub fn local(records: Vec<Record>, page_size: PageSize) -> Self {
        Self::new(DataSource::Local(records), page_size)
    }

    /// Provider over a remote endpoint
    pub fn remote(source: RemoteSource, page_size: PageSize) -> Self {
        Self::new(DataSource::Remote(source), page_size)
    }

    /// Build from validated configuration.
    ///
    /// Remote sources use `transport` when given, else an [`HttpTransport`].
    pub fn from_config(config: &GridConfig, transport: Option<Arc<dyn Transport>>) -> Result<Self> {
        config.validate()?;

        let source = match (&config.data, &config.url) {
            (Some(data), _) => DataSource::Local(data.clone()),
            (None, Some(url)) => DataSource::Remote(RemoteSource {
                url: url.clone(),
                params: config.request_params(),
                transport: transport.unwrap_or_else(|| {
                    let mut http = HttpTransport::new(config.response_shape());
                    if let Some(timeout) = config.request_timeout() {
                        http = http.timeout(timeout);
                    }
                    Arc::new(http) as Arc<dyn Transport>
                }),
            }),
            (None, None) => {
                return Err(Error::configuration(
                    "`data_file` must be resolved with GridConfig::prepare",
                ));
            }
        };

        let mut provider = Self::new(source, config.page_size());
        provider.sort = SortState::new(config.default_sort_column.clone(), config.default_sort_type);
        Ok(provider)
    }

    // ==================== Getters ====================

    /// Records of the last applied page
    pub fn data(&self) -> &[Record] {
        &self.records
    }

    /// Total rows across all pages (0 before the first fetch)
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        compute_total_pages(self.total_count, self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort.column()
    }

    pub fn sort_type(&self) -> SortType {
        self.sort.sort_type()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.source, DataSource::Remote(_))
    }

    /// Bumped on every state change
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ==================== Setters ====================

    fn touch(&mut self) {
        self.generation += 1;
    }

    /// Store or overwrite a column keyword. Does not fetch.
    pub fn set_filter(&mut self, column: impl Into<String>, keyword: impl Into<String>) {
        let column = column.into();
        let keyword = keyword.into();
        tracing::debug!(%column, %keyword, "set filter");
        self.filters.set(column, keyword);
        self.touch();
    }

    /// Remove a column filter. Returns whether one existed.
    pub fn clear_filter(&mut self, column: &str) -> bool {
        self.touch();
        self.filters.clear(column).is_some()
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear_all();
        self.touch();
    }

    /// Set the sort column; `None` keeps the current direction
    pub fn set_sort(&mut self, column: impl Into<String>, sort_type: Option<SortType>) {
        self.sort.set(column, sort_type);
        tracing::debug!(column = ?self.sort.column(), sort_type = ?self.sort.sort_type(), "set sort");
        self.touch();
    }

    /// Back to natural order
    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.touch();
    }

    /// Store the page index as given (minimum 1); no clamping to the page count
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index.max(1);
        self.touch();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.touch();
    }

    // ==================== Fetching ====================

    /// Request for the current state of a remote source
    pub fn remote_query(&self, remote: &RemoteSource) -> RemoteQuery {
        let params = &remote.params;
        let mut query = RemoteQuery::new(remote.url.clone());

        if let Some(size) = self.page_size.get() {
            query.push(&params.page_param, self.page_index.to_string());
            query.push(&params.page_size_param, size.to_string());
        }
        if let Some(column) = self.sort.column() {
            query.push(
                &params.sort_param,
                params.sort_format.format(column, self.sort.sort_type()),
            );
        }
        for (column, keyword) in self.filters.active() {
            query.push(column, keyword);
        }
        for (name, value) in &params.additional {
            query.push(name, value);
        }

        query
    }

    /// Filter, sort and slice a static collection for the current state
    pub fn local_page(&self, records: &[Record]) -> Result<RemotePage> {
        let mut matched = Vec::new();
        for record in records {
            if self.filters.matches(record)? {
                matched.push(record);
            }
        }

        if let Some(column) = self.sort.column() {
            let mut keyed = matched
                .into_iter()
                .map(|record| resolve_scalar(record, column).map(|key| (key, record)))
                .collect::<Result<Vec<_>>>()?;

            let sort_type = self.sort.sort_type();
            // sort_by is stable, so equal keys keep their source order
            keyed.sort_by(|(a, _), (b, _)| match sort_type {
                SortType::Asc => compare_values(a, b),
                SortType::Desc => compare_values(b, a),
            });
            matched = keyed.into_iter().map(|(_, record)| record).collect();
        }

        let total_count = matched.len();
        let range = page_range(self.page_index, self.page_size, total_count);
        let records = matched[range].iter().map(|record| (*record).clone()).collect();

        Ok(RemotePage {
            records,
            total_count,
        })
    }

    /// Capture a fetch for the current state
    pub fn begin_fetch(&self) -> FetchTicket {
        let work = match &self.source {
            DataSource::Local(records) => FetchWork::Ready(self.local_page(records)),
            DataSource::Remote(remote) => FetchWork::Remote {
                transport: remote.transport.clone(),
                query: self.remote_query(remote),
            },
        };
        FetchTicket {
            generation: self.generation,
            work,
        }
    }

    /// Apply a resolved fetch.
    ///
    /// Failures leave the previous page in place and are returned. Outcomes
    /// from an older generation are dropped, including their errors.
    pub fn complete_fetch(&mut self, outcome: FetchOutcome) -> Result<FetchStatus> {
        if outcome.generation != self.generation {
            match &outcome.result {
                Ok(_) => tracing::warn!(
                    requested = outcome.generation,
                    current = self.generation,
                    "Discarding stale page"
                ),
                Err(e) => tracing::warn!(
                    requested = outcome.generation,
                    current = self.generation,
                    "Discarding stale fetch error: {e}"
                ),
            }
            return Ok(FetchStatus::Stale);
        }

        let page = outcome.result?;
        tracing::debug!(
            records = page.records.len(),
            total = page.total_count,
            page = self.page_index,
            "Page applied"
        );
        self.records = page.records;
        self.total_count = page.total_count;
        Ok(FetchStatus::Applied)
    }

    /// Fetch the current page and apply it
    pub async fn fetch(&mut self) -> Result<FetchStatus> {
        let outcome = self.begin_fetch().run().await;
        self.complete_fetch(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transport::testing::MockTransport;
    use serde_json::{Value, json};

    fn rows(value: Value) -> Vec<Record> {
        value
            .as_array()
            .expect("array")
            .iter()
            .map(|v| v.as_object().cloned().expect("object"))
            .collect()
    }

    fn numbered(count: usize) -> Vec<Record> {
        (1..=count)
            .map(|i| {
                let status = if i % 3 == 0 { "inactive" } else { "active" };
                json!({
                    "id": i,
                    "status": status,
                    "owner": {"name": format!("user{:02}", count + 1 - i)}
                })
                .as_object()
                .cloned()
                .expect("object")
            })
            .collect()
    }

    fn page_size(n: usize) -> PageSize {
        PageSize::rows(n).expect("rows")
    }

    fn remote(transport: Arc<MockTransport>) -> RemoteSource {
        RemoteSource {
            url: "https://example.test/rows".to_string(),
            params: RequestParams::default(),
            transport,
        }
    }

    #[tokio::test]
    async fn test_local_paging_scenario() {
        let mut provider = DataProvider::local(numbered(25), page_size(10));
        assert_eq!(provider.total_count(), 0);

        provider.fetch().await.expect("fetch");
        assert_eq!(provider.total_pages(), 3);
        assert_eq!(provider.data().len(), 10);

        provider.set_page_index(3);
        provider.fetch().await.expect("fetch");
        assert_eq!(provider.data().len(), 5);
        assert_eq!(provider.data()[0]["id"], json!(21));
    }

    #[tokio::test]
    async fn test_local_filter_reduces_total() {
        let mut provider = DataProvider::local(numbered(25), page_size(10));
        provider.set_filter("status", "Active");
        provider.fetch().await.expect("fetch");
        // "inactive" also contains "active"
        assert_eq!(provider.total_count(), 25);

        provider.set_filter("status", "inact");
        provider.fetch().await.expect("fetch");
        assert_eq!(provider.total_count(), 8);
        assert!(provider.data().iter().all(|r| r["status"] == json!("inactive")));
    }

    #[tokio::test]
    async fn test_local_filter_exact_status() {
        let data = rows(json!([
            {"name": "a", "status": "active"},
            {"name": "b", "status": "disabled"},
            {"name": "c", "status": "active"}
        ]));
        let mut provider = DataProvider::local(data, page_size(10));
        provider.set_filter("status", "active");
        provider.fetch().await.expect("fetch");
        assert_eq!(provider.total_count(), 2);
    }

    #[tokio::test]
    async fn test_local_sort_nested_desc() {
        let mut provider = DataProvider::local(numbered(5), page_size(10));
        provider.set_sort("owner.name", Some(SortType::Asc));
        provider.fetch().await.expect("fetch");
        let ids: Vec<_> = provider.data().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(5), json!(4), json!(3), json!(2), json!(1)]);

        provider.set_sort("id", Some(SortType::Desc));
        provider.fetch().await.expect("fetch");
        assert_eq!(provider.data()[0]["id"], json!(5));
    }

    #[tokio::test]
    async fn test_local_sort_is_stable() {
        let data = rows(json!([
            {"k": 1, "tag": "first"},
            {"k": 0, "tag": "zero"},
            {"k": 1, "tag": "second"}
        ]));
        let mut provider = DataProvider::local(data, PageSize::Disabled);
        provider.set_sort("k", Some(SortType::Desc));
        provider.fetch().await.expect("fetch");
        let tags: Vec<_> = provider.data().iter().map(|r| r["tag"].clone()).collect();
        assert_eq!(tags, vec![json!("first"), json!("second"), json!("zero")]);
    }

    #[tokio::test]
    async fn test_filter_sort_page_round_trip() {
        let data = numbered(12);
        let mut provider = DataProvider::local(data.clone(), page_size(3));
        provider.set_filter("owner.name", "USER");
        provider.set_sort("owner.name", Some(SortType::Asc));
        provider.fetch().await.expect("fetch");

        let total = provider.total_count();
        assert_eq!(total, 12);
        provider.set_page_size(page_size(total));
        provider.fetch().await.expect("fetch");

        let names: Vec<_> = provider
            .data()
            .iter()
            .map(|r| r["owner"]["name"].as_str().expect("name").to_string())
            .collect();
        let mut expected: Vec<_> = data
            .iter()
            .map(|r| r["owner"]["name"].as_str().expect("name").to_string())
            .collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_paging_disabled_returns_everything() {
        let mut provider = DataProvider::local(numbered(25), PageSize::Disabled);
        provider.set_page_index(2);
        provider.fetch().await.expect("fetch");
        assert_eq!(provider.data().len(), 25);
        assert_eq!(provider.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_malformed_sort_column_surfaces() {
        let data = rows(json!([{"owner": {"name": "a"}}, {"owner": {"name": "b"}}]));
        let mut provider = DataProvider::local(data, page_size(10));
        provider.set_sort("owner", None);
        let err = provider.fetch().await.expect_err("mapping");
        assert!(matches!(err, Error::MalformedRecord { .. }));
        assert!(provider.data().is_empty());
    }

    #[test]
    fn test_set_sort_preserves_direction() {
        let mut provider = DataProvider::local(Vec::new(), page_size(10));
        provider.set_sort("name", None);
        assert_eq!(provider.sort_type(), SortType::Asc);
        provider.set_sort("name", Some(SortType::Desc));
        provider.set_sort("age", None);
        assert_eq!(provider.sort_column(), Some("age"));
        assert_eq!(provider.sort_type(), SortType::Desc);
    }

    #[test]
    fn test_page_index_is_stored_unclamped() {
        let mut provider = DataProvider::local(numbered(5), page_size(10));
        provider.set_page_index(9);
        assert_eq!(provider.page_index(), 9);
        provider.set_page_index(0);
        assert_eq!(provider.page_index(), 1);
    }

    #[test]
    fn test_remote_query_parameters() {
        let transport = MockTransport::new();
        let mut source = remote(transport);
        source
            .params
            .additional
            .insert("tenant".to_string(), "acme".to_string());
        let mut provider = DataProvider::remote(source, page_size(25));

        provider.set_page_index(2);
        provider.set_sort("name", Some(SortType::Desc));
        provider.set_filter("status", "active");
        provider.set_filter("owner.name", "");

        let ticket = provider.begin_fetch();
        let query = ticket.query().expect("remote query");
        assert_eq!(
            query.params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("pageSize".to_string(), "25".to_string()),
                ("sort".to_string(), "name desc".to_string()),
                ("status".to_string(), "active".to_string()),
                ("tenant".to_string(), "acme".to_string()),
            ]
        );
    }

    #[test]
    fn test_remote_query_without_paging_and_signed_sort() {
        let mut source = remote(MockTransport::new());
        source.params.sort_format = SortFormat::Signed;
        source.params.sort_param = "order".to_string();
        let mut provider = DataProvider::remote(source.clone(), PageSize::Disabled);
        provider.set_sort("created", Some(SortType::Desc));

        let query = provider.remote_query(&source);
        assert_eq!(query.param("page"), None);
        assert_eq!(query.param("pageSize"), None);
        assert_eq!(query.param("order"), Some("-created"));
    }

    #[tokio::test]
    async fn test_remote_fetch_stores_page() {
        let transport = MockTransport::new();
        transport.respond(Ok(RemotePage {
            records: numbered(10),
            total_count: 95,
        }));
        let mut provider = DataProvider::remote(remote(transport.clone()), page_size(10));

        assert_eq!(provider.fetch().await.expect("fetch"), FetchStatus::Applied);
        assert_eq!(provider.data().len(), 10);
        assert_eq!(provider.total_count(), 95);
        assert_eq!(provider.total_pages(), 10);
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_keeps_previous_page() {
        let transport = MockTransport::new();
        transport.respond(Ok(RemotePage {
            records: numbered(3),
            total_count: 3,
        }));
        transport.respond(Err(Error::Transport {
            message: "HTTP 503".to_string(),
        }));
        let mut provider = DataProvider::remote(remote(transport), page_size(10));
        provider.fetch().await.expect("first fetch");
        let before = provider.data().to_vec();

        provider.set_page_index(2);
        let err = provider.fetch().await.expect_err("second fetch");
        assert!(err.is_transport());
        assert_eq!(provider.data(), before.as_slice());
        assert_eq!(provider.total_count(), 3);
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let transport = MockTransport::new();
        transport.respond(Ok(RemotePage {
            records: numbered(2),
            total_count: 2,
        }));
        let mut provider = DataProvider::remote(remote(transport), page_size(10));

        let ticket = provider.begin_fetch();
        provider.set_filter("status", "active");
        let outcome = ticket.run().await;

        assert_eq!(
            provider.complete_fetch(outcome).expect("complete"),
            FetchStatus::Stale
        );
        assert!(provider.data().is_empty());
        assert_eq!(provider.total_count(), 0);
    }
}
