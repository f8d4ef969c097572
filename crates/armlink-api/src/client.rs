// Async client for Azure Resource Manager.
//
// Base URL: the cloud's resource-manager endpoint
// Auth: `Authorization: Bearer <token>` default header
//
// Every request carries an `api-version` query parameter, either supplied by
// the caller or derived from the path (see `api_version::resolve`). Bodies are
// exchanged as `serde_json::Value` internally and decoded at the edge so raw
// documents stay available for error reporting.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::lro::{self, PollConfig};
use crate::types::ErrorResponse;
use crate::{Error, TransportConfig, api_version};

/// Owned query parameters.
pub(crate) type Query = Vec<(String, String)>;

const SKIP_TOKEN_KEYS: [&str; 2] = ["$skipToken", "$skiptoken"];

/// Async client for Azure Resource Manager, scoped to one subscription.
///
/// Cheap to clone; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    subscription_id: String,
    poll: PollConfig,
}

impl ArmClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// The token is injected as a sensitive default `Authorization` header.
    pub fn from_token(
        endpoint: &str,
        subscription_id: impl Into<String>,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid bearer token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_reqwest(endpoint, subscription_id, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        endpoint: &str,
        subscription_id: impl Into<String>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let subscription_id = subscription_id.into();
        if subscription_id.is_empty() {
            return Err(Error::InvalidRequest {
                message: "subscription id is required".into(),
            });
        }
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(endpoint)?,
            subscription_id,
            poll: PollConfig::default(),
        })
    }

    /// Override long-running-operation polling.
    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an ARM path (leading slash optional) onto the endpoint.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Subscription-scoped listing path for a resource type.
    fn list_path(&self, resource: &str) -> String {
        let sub = &self.subscription_id;
        match resource {
            "locations" | "resourcegroups" | "providers" => {
                format!("subscriptions/{sub}/{resource}")
            }
            _ if resource.starts_with("subscriptions/") || resource.starts_with("/subscriptions/") => {
                resource.trim_start_matches('/').to_owned()
            }
            _ => format!("subscriptions/{sub}/providers/{resource}"),
        }
    }

    /// Copy caller params and add the routed `api-version` when missing.
    fn query_for(resource: &str, params: &[(&str, &str)]) -> Query {
        let mut query: Query = params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        if !query.iter().any(|(k, _)| k == "api-version") {
            query.push((
                "api-version".into(),
                api_version::resolve(resource).to_owned(),
            ));
        }
        query
    }

    // ── Request core ─────────────────────────────────────────────────

    /// Send one request and settle any long-running operation it starts.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut request = self.http.request(method.clone(), url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(parse_error(status, path, resp).await);
        }

        let operation = lro::operation_url(resp.headers());
        let text = resp.text().await?;
        let value = parse_body(text)?;

        match operation {
            Some(location) if value.get("id").is_none() => {
                let version = query
                    .iter()
                    .find(|(k, _)| k == "api-version")
                    .map(|(_, v)| v.as_str())
                    .unwrap_or(api_version::DEFAULT);
                self.wait_operation(&format!("{method} {path}"), &location, version)
                    .await
            }
            _ => Ok(value),
        }
    }

    /// Follow `nextLink` pages, collecting every item.
    async fn collect_pages(&self, path: &str, mut query: Query) -> Result<Vec<Value>, Error> {
        let mut items = Vec::new();
        let mut previous: Option<String> = None;

        loop {
            let doc = self.send(Method::GET, path, &query, None).await?;
            let (page, next_link) = split_page(doc)?;
            items.extend(page);

            let Some(next_link) = next_link else {
                break;
            };
            let Some((key, token)) = next_skip_token(&next_link, previous.as_deref())? else {
                break;
            };
            query.retain(|(k, _)| !SKIP_TOKEN_KEYS.contains(&k.as_str()));
            query.push((key, token.clone()));
            previous = Some(token);
        }

        Ok(items)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Listing ──────────────────────────────────────────────────────

    /// List every resource of a type in the subscription, across pages.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let path = self.list_path(resource);
        let items = self
            .collect_pages(&path, Self::query_for(resource, params))
            .await?;
        items.into_iter().map(decode).collect()
    }

    /// List a path with an explicit `api-version`.
    pub async fn list_v2<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut query = Self::query_for(path, params);
        set_api_version(&mut query, api_version);
        let items = self.collect_pages(path, query).await?;
        items.into_iter().map(decode).collect()
    }

    /// Generic `/subscriptions/{sub}/resources` listing for one resource type,
    /// optionally narrowed to a location. Returns `{"value": [...]}`.
    pub async fn list_resources(
        &self,
        resource_type: &str,
        api_version: &str,
        location: Option<&str>,
    ) -> Result<Value, Error> {
        let mut filter = format!("resourceType eq '{resource_type}'");
        if let Some(location) = location {
            filter = format!("location eq '{location}' and {filter}");
        }
        let path = format!("subscriptions/{}/resources", self.subscription_id);
        let query: Query = vec![
            ("$filter".into(), filter),
            ("api-version".into(), api_version.to_owned()),
        ];
        let items = self.collect_pages(&path, query).await?;
        Ok(serde_json::json!({ "value": items }))
    }

    // ── Single resources ─────────────────────────────────────────────

    /// GET a resource by full ARM id. An empty id is reported as not found.
    pub async fn get<T: DeserializeOwned>(
        &self,
        id: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        if id.is_empty() {
            return Err(Error::NotFound {
                resource: String::new(),
                body: String::new(),
            });
        }
        let query = Self::query_for(id, params);
        decode(self.send(Method::GET, id, &query, None).await?)
    }

    /// GET a path with an explicit `api-version`.
    pub async fn show<T: DeserializeOwned>(&self, path: &str, api_version: &str) -> Result<T, Error> {
        let query: Query = vec![("api-version".into(), api_version.to_owned())];
        decode(self.send(Method::GET, path, &query, None).await?)
    }

    /// PUT a new resource into a resource group. `name` and `type` are read
    /// from the body.
    pub async fn create<T: DeserializeOwned>(
        &self,
        resource_group: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = to_value(body)?;
        let name = string_field(&body, &["name", "Name"]).ok_or_else(|| Error::InvalidRequest {
            message: "create body has no name".into(),
        })?;
        let resource_type =
            string_field(&body, &["type", "Type"]).ok_or_else(|| Error::InvalidRequest {
                message: format!("create body for {name} has no type"),
            })?;
        let path = format!(
            "subscriptions/{}/resourceGroups/{resource_group}/providers/{resource_type}/{name}",
            self.subscription_id
        );
        let query = Self::query_for(&resource_type, &[]);
        decode(self.send(Method::PUT, &path, &query, Some(&body)).await?)
    }

    /// PUT a body to an arbitrary path.
    pub async fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T, Error> {
        let body = to_value(body)?;
        let query = Self::query_for(path, &[]);
        decode(self.send(Method::PUT, path, &query, Some(&body)).await?)
    }

    /// PUT a document back to its own `id`.
    pub async fn update<T: DeserializeOwned>(&self, body: &impl Serialize) -> Result<T, Error> {
        let body = to_value(body)?;
        let id = string_field(&body, &["id", "Id", "ID"]).ok_or_else(|| Error::InvalidRequest {
            message: "failed to find id for update".into(),
        })?;
        let query = Self::query_for(&id, &[]);
        decode(self.send(Method::PUT, &id, &query, Some(&body)).await?)
    }

    /// DELETE a resource. A resource that is already gone counts as deleted.
    pub async fn del(&self, id: &str) -> Result<(), Error> {
        let query = Self::query_for(id, &[]);
        match self.send(Method::DELETE, id, &query, None).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!("{id} already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = to_value(body)?;
        let query = Self::query_for(path, &[]);
        decode(self.send(Method::PATCH, path, &query, Some(&body)).await?)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = to_value(body)?;
        let query = Self::query_for(path, &[]);
        decode(self.send(Method::POST, path, &query, Some(&body)).await?)
    }

    /// POST a body to a path with an explicit `api-version`.
    pub async fn post_v2<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let body = to_value(body)?;
        let query: Query = vec![("api-version".into(), api_version.to_owned())];
        decode(self.send(Method::POST, path, &query, Some(&body)).await?)
    }

    /// POST to `<id>/<action>`.
    pub async fn perform<T: DeserializeOwned>(
        &self,
        id: &str,
        action: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        self.post(&format!("{}/{action}", id.trim_end_matches('/')), body)
            .await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn parse_error(status: reqwest::StatusCode, path: &str, resp: reqwest::Response) -> Error {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Error::InvalidToken;
    }

    let raw = resp.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Error::NotFound {
            resource: path.to_owned(),
            body: raw,
        };
    }

    let parsed = serde_json::from_str::<ErrorResponse>(&raw).unwrap_or_default();
    Error::Arm {
        status: status.as_u16(),
        code: parsed.code().map(str::to_owned),
        message: parsed
            .message()
            .map_or_else(|| status.to_string(), str::to_owned),
        body: if raw.is_empty() {
            status.to_string()
        } else {
            raw
        },
    }
}

pub(crate) fn parse_body(text: String) -> Result<Value, Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| {
        let preview: String = text.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: text,
        }
    })
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(&value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

fn to_value(body: &impl Serialize) -> Result<Value, Error> {
    serde_json::to_value(body).map_err(|e| Error::InvalidRequest {
        message: format!("failed to encode request body: {e}"),
    })
}

fn string_field(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| body.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

fn set_api_version(query: &mut Query, version: &str) {
    query.retain(|(k, _)| k != "api-version");
    query.push(("api-version".into(), version.to_owned()));
}

/// Split a listing document into its items and `nextLink`.
///
/// ARM usually wraps items in `value`; a few endpoints return a bare array.
fn split_page(doc: Value) -> Result<(Vec<Value>, Option<String>), Error> {
    match doc {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut map) => {
            let next_link = map
                .get("nextLink")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned);
            match map.remove("value") {
                Some(Value::Array(items)) => Ok((items, next_link)),
                Some(Value::Null) | None => Ok((Vec::new(), next_link)),
                Some(other) => Err(Error::Deserialization {
                    message: "listing `value` is not an array".into(),
                    body: other.to_string(),
                }),
            }
        }
        Value::Null => Ok((Vec::new(), None)),
        other => Err(Error::Deserialization {
            message: "listing is neither an array nor an object".into(),
            body: other.to_string(),
        }),
    }
}

/// Pick the continuation token out of a `nextLink`, ignoring a token that
/// repeats the previous one.
fn next_skip_token(next_link: &str, previous: Option<&str>) -> Result<Option<(String, String)>, Error> {
    let link = Url::parse(next_link)?;
    for key in SKIP_TOKEN_KEYS {
        let found = link
            .query_pairs()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
            .find(|v| !v.is_empty() && Some(v.as_str()) != previous);
        if let Some(token) = found {
            return Ok(Some((key.to_owned(), token)));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ArmClient {
        ArmClient::from_reqwest("https://management.azure.com", "sub-1", reqwest::Client::new())
            .unwrap()
    }

    #[test]
    fn list_path_mapping() {
        let c = client();
        assert_eq!(c.list_path("locations"), "subscriptions/sub-1/locations");
        assert_eq!(c.list_path("resourcegroups"), "subscriptions/sub-1/resourcegroups");
        assert_eq!(
            c.list_path("Microsoft.Network/virtualNetworks"),
            "subscriptions/sub-1/providers/Microsoft.Network/virtualNetworks"
        );
        assert_eq!(
            c.list_path("/subscriptions/other/resourceGroups/rg/providers/Microsoft.Web/sites"),
            "subscriptions/other/resourceGroups/rg/providers/Microsoft.Web/sites"
        );
    }

    #[test]
    fn caller_api_version_wins() {
        let q = ArmClient::query_for("Microsoft.Web/sites", &[("api-version", "2023-12-01")]);
        assert_eq!(q, vec![("api-version".to_owned(), "2023-12-01".to_owned())]);

        let q = ArmClient::query_for("Microsoft.Network/virtualNetworks", &[]);
        assert_eq!(q[0].1, api_version::NETWORK);
    }

    #[test]
    fn skip_token_extraction() {
        let link = "https://management.azure.com/x?api-version=1&$skiptoken=abc";
        assert_eq!(
            next_skip_token(link, None).unwrap(),
            Some(("$skiptoken".to_owned(), "abc".to_owned()))
        );
        assert_eq!(next_skip_token(link, Some("abc")).unwrap(), None);
        assert_eq!(
            next_skip_token("https://management.azure.com/x?api-version=1", None).unwrap(),
            None
        );
    }

    #[test]
    fn split_page_shapes() {
        let (items, next) = split_page(json!({"value": [1, 2], "nextLink": "n"})).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(next.as_deref(), Some("n"));

        let (items, next) = split_page(json!([1])).unwrap();
        assert_eq!(items.len(), 1);
        assert!(next.is_none());

        assert!(split_page(json!("nope")).is_err());
    }

    #[test]
    fn base_url_always_has_trailing_slash() {
        let c = ArmClient::from_reqwest("http://127.0.0.1:8080/arm", "s", reqwest::Client::new())
            .unwrap();
        assert_eq!(c.base_url().as_str(), "http://127.0.0.1:8080/arm/");
        assert_eq!(
            c.url("/subscriptions/s/locations").unwrap().as_str(),
            "http://127.0.0.1:8080/arm/subscriptions/s/locations"
        );
    }

    #[test]
    fn empty_subscription_is_rejected() {
        assert!(ArmClient::from_reqwest("https://management.azure.com", "", reqwest::Client::new())
            .is_err());
    }
}
