use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{
    CollectionPage, CommitAction, EntryKind, FileRecord, RemoteCollection, Result, StoreConfig,
    StoreError, TransferEncoding, TreeEntry, TreePage,
};
use super::{RemoteStore, TokenProvider};

/// Tree listing row as returned by the API
#[derive(Debug, Deserialize)]
struct GitlabTreeRow {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    mode: String,
}

/// Repository file as returned by the API
#[derive(Debug, Deserialize)]
struct GitlabFile {
    file_path: String,
    content: String,
    encoding: String,
    blob_id: Option<String>,
    last_commit_id: Option<String>,
}

/// One file action in a commit request
#[derive(Debug, Serialize)]
struct GitlabCommitAction<'a> {
    action: &'static str,
    file_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

impl<'a> From<&'a CommitAction> for GitlabCommitAction<'a> {
    fn from(action: &'a CommitAction) -> Self {
        match action {
            CommitAction::Create { path, content } => Self {
                action: "create",
                file_path: path,
                content: Some(content),
            },
            CommitAction::Update { path, content } => Self {
                action: "update",
                file_path: path,
                content: Some(content),
            },
            CommitAction::Delete { path } => Self {
                action: "delete",
                file_path: path,
                content: None,
            },
        }
    }
}

/// Commit request body
#[derive(Debug, Serialize)]
struct GitlabCommitBody<'a> {
    branch: &'a str,
    commit_message: &'a str,
    actions: Vec<GitlabCommitAction<'a>>,
}

/// Store client for repositories hosted on a GitLab instance.
///
/// Wraps GitLab REST v4: tree listing, file reads and multi-action commits
/// for the configured project and ref, plus the pipeline, branch and commit
/// collections behind the specialized read-only resources.
pub struct GitlabStore {
    http: HttpClient,
    api_url: String,
    token: Box<dyn TokenProvider>,
    project_id: String,
    ref_name: String,
    tree_per_page: u64,
}

impl GitlabStore {
    /// Create a store client for the configured project and ref.
    ///
    /// The bearer token is supplied as an explicit capability, never read
    /// from ambient state.
    pub fn new(config: &StoreConfig, token: Box<dyn TokenProvider>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url(),
            token,
            project_id: config.project_id.clone(),
            ref_name: config.ref_name.clone(),
            tree_per_page: config.tree_per_page,
        })
    }

    /// URL of a project-scoped API route
    fn project_url(&self, tail: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.api_url,
            urlencoding::encode(&self.project_id),
            tail
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.token())
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.bearer())
            .query(query)
            .send()
            .await?;
        error_for_status(response).await
    }

    /// API path and ref query parameter of a specialized collection
    fn collection_route(&self, collection: RemoteCollection) -> (&'static str, Option<(&str, &str)>) {
        match collection {
            RemoteCollection::Pipelines => ("pipelines", Some(("ref", self.ref_name.as_str()))),
            RemoteCollection::Branches => ("repository/branches", None),
            RemoteCollection::Commits => {
                ("repository/commits", Some(("ref_name", self.ref_name.as_str())))
            }
        }
    }
}

#[async_trait]
impl RemoteStore for GitlabStore {
    async fn list_tree_page(&self, path: &str, page: u64) -> Result<TreePage> {
        let url = self.project_url("repository/tree");
        let page_param = page.to_string();
        let per_page = self.tree_per_page.to_string();
        let query = [
            ("path", path),
            ("ref", self.ref_name.as_str()),
            ("page", page_param.as_str()),
            ("per_page", per_page.as_str()),
        ];

        log::debug!("listing tree page {} under {}", page, path);
        let response = self.get(&url, &query).await?;
        let total_pages = parse_total_pages(response.headers());

        let rows: Vec<GitlabTreeRow> = response.json().await?;
        let entries = rows
            .into_iter()
            .map(|row| {
                Ok(TreeEntry {
                    kind: EntryKind::from_str(&row.kind)?,
                    path: row.path,
                    mode: row.mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TreePage {
            entries,
            total_pages,
        })
    }

    async fn read_file(&self, path: &str) -> Result<FileRecord> {
        let url = self.project_url(&format!(
            "repository/files/{}",
            urlencoding::encode(path)
        ));

        log::debug!("reading file {}", path);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .query(&[("ref", self.ref_name.as_str())])
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let response = error_for_status(response).await?;

        let body: GitlabFile = response.json().await?;
        Ok(FileRecord {
            path: body.file_path,
            content: body.content,
            encoding: TransferEncoding::from_str(&body.encoding)?,
            blob_id: body.blob_id,
            last_commit_id: body.last_commit_id,
        })
    }

    async fn write_commit(&self, message: &str, actions: &[CommitAction]) -> Result<()> {
        let url = self.project_url("repository/commits");
        let body = GitlabCommitBody {
            branch: &self.ref_name,
            commit_message: message,
            actions: actions.iter().map(GitlabCommitAction::from).collect(),
        };

        log::debug!("writing commit with {} action(s)", actions.len());
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.bearer())
            .json(&body)
            .send()
            .await?;
        error_for_status(response).await?;
        Ok(())
    }

    async fn list_collection_page(
        &self,
        collection: RemoteCollection,
        page: u64,
        per_page: u64,
    ) -> Result<CollectionPage> {
        let (tail, ref_param) = self.collection_route(collection);
        let url = self.project_url(tail);
        let page_param = page.to_string();
        let per_page_param = per_page.to_string();
        let mut query = vec![
            ("page", page_param.as_str()),
            ("per_page", per_page_param.as_str()),
        ];
        if let Some(param) = ref_param {
            query.push(param);
        }

        log::debug!("listing {} page {}", tail, page);
        let response = self.get(&url, &query).await?;
        let total = parse_total(response.headers());
        let total_pages = parse_total_pages(response.headers());

        let records: Vec<Map<String, Value>> = response.json().await?;
        Ok(CollectionPage {
            records,
            total,
            total_pages,
        })
    }

    async fn read_collection_item(
        &self,
        collection: RemoteCollection,
        id: &str,
    ) -> Result<Map<String, Value>> {
        let (tail, _) = self.collection_route(collection);
        let url = self.project_url(&format!("{}/{}", tail, urlencoding::encode(id)));

        log::debug!("reading {} item {}", tail, id);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let response = error_for_status(response).await?;

        Ok(response.json().await?)
    }
}

/// Map any non-2xx response to a `Remote` error carrying status and body
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Remote {
        status: status.as_u16(),
        body,
    })
}

/// Total page count from response metadata.
///
/// Absent or unparsable metadata yields 0, which downstream aggregation
/// treats as "no additional pages"; this fallback is deliberate and is what
/// keeps pagination working against stores that omit the header.
fn parse_total_pages(headers: &HeaderMap) -> u64 {
    headers
        .get("x-total-pages")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}

/// Total record count from response metadata, when present.
///
/// Keyset-paginated listings omit it; callers fall back to an estimate.
fn parse_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("x-total")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                reqwest::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn total_pages_parses_header() {
        assert_eq!(parse_total_pages(&headers(&[("x-total-pages", "7")])), 7);
    }

    #[test]
    fn total_pages_defaults_to_zero_when_absent_or_invalid() {
        assert_eq!(parse_total_pages(&headers(&[])), 0);
        assert_eq!(
            parse_total_pages(&headers(&[("x-total-pages", "not a number")])),
            0
        );
    }

    #[test]
    fn total_is_optional() {
        assert_eq!(parse_total(&headers(&[("x-total", "23")])), Some(23));
        assert_eq!(parse_total(&headers(&[])), None);
    }

    #[test]
    fn commit_actions_serialize_to_wire_format() {
        let actions = vec![
            CommitAction::Create {
                path: "data/users/a".to_string(),
                content: "{}".to_string(),
            },
            CommitAction::Delete {
                path: "data/users/b".to_string(),
            },
        ];
        let body = GitlabCommitBody {
            branch: "main",
            commit_message: "Delete many",
            actions: actions.iter().map(GitlabCommitAction::from).collect(),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "branch": "main",
                "commit_message": "Delete many",
                "actions": [
                    { "action": "create", "file_path": "data/users/a", "content": "{}" },
                    { "action": "delete", "file_path": "data/users/b" },
                ],
            })
        );
    }
}
