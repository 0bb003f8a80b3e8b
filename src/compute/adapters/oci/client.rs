//! Signed REST client for the identity and compute services.

use super::signer::{RequestSigner, SignableRequest};
use super::wire::{CompartmentPayload, InstancePayload, error_from_response};
use crate::compute::{
    domain::{Compartment, CompartmentId, ComputeInstance, InstanceId, ProviderAction, RegionId},
    ports::{
        Page, ProviderClient, ProviderConnector, ProviderError, ProviderErrorKind, ProviderResult,
    },
};
use crate::config::CredentialContext;
use async_trait::async_trait;
use mockable::Clock;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Second-level domain of the commercial realm.
pub const DEFAULT_REALM_DOMAIN: &str = "oraclecloud.com";

const API_VERSION: &str = "20160918";
const NEXT_PAGE_HEADER: &str = "opc-next-page";
const REQUEST_ID_HEADER: &str = "opc-request-id";
const USER_AGENT: &str = concat!("oci-compute-tools/", env!("CARGO_PKG_VERSION"));

/// Where regional service endpoints live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OciEndpoints {
    /// Endpoints derived from the region code within a realm domain.
    Realm {
        /// Second-level domain such as `oraclecloud.com`.
        domain: String,
    },
    /// Fixed base URLs used for every region.
    Fixed {
        /// Identity service base URL.
        identity: Url,
        /// Compute service base URL.
        compute: Url,
    },
}

impl Default for OciEndpoints {
    fn default() -> Self {
        Self::Realm {
            domain: DEFAULT_REALM_DOMAIN.to_owned(),
        }
    }
}

impl OciEndpoints {
    /// Returns the identity and compute base URLs for `region`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidEndpoint` error when a derived URL does not parse.
    pub fn resolve(&self, region: &RegionId) -> ProviderResult<(Url, Url)> {
        match self {
            Self::Realm { domain } => Ok((
                parse_endpoint(&format!("https://identity.{region}.oci.{domain}"))?,
                parse_endpoint(&format!("https://iaas.{region}.{domain}"))?,
            )),
            Self::Fixed { identity, compute } => Ok((identity.clone(), compute.clone())),
        }
    }
}

fn parse_endpoint(raw: &str) -> ProviderResult<Url> {
    Url::parse(raw).map_err(|err| {
        ProviderError::new(
            ProviderErrorKind::InvalidRequest,
            "InvalidEndpoint",
            format!("invalid endpoint '{raw}': {err}"),
        )
    })
}

/// Builds [`OciRegionClient`]s that sign with the context's API key.
#[derive(Debug, Clone)]
pub struct OciConnector<K> {
    endpoints: OciEndpoints,
    clock: Arc<K>,
}

impl<K> OciConnector<K>
where
    K: Clock + Send + Sync + 'static,
{
    /// Creates a connector for `endpoints`, dating requests with `clock`.
    #[must_use]
    pub const fn new(endpoints: OciEndpoints, clock: Arc<K>) -> Self {
        Self { endpoints, clock }
    }

    /// Returns the endpoint configuration.
    #[must_use]
    pub const fn endpoints(&self) -> &OciEndpoints {
        &self.endpoints
    }
}

#[async_trait]
impl<K> ProviderConnector for OciConnector<K>
where
    K: Clock + Send + Sync + 'static,
{
    type Client = OciRegionClient<K>;

    async fn connect(
        &self,
        context: &CredentialContext,
        region: &RegionId,
    ) -> ProviderResult<Self::Client> {
        let signer = RequestSigner::from_context(context)?;
        let (identity, compute) = self.endpoints.resolve(region)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| transport_error(&err))?;
        debug!(region = %region, identity = %identity, compute = %compute, "resolved endpoints");

        Ok(OciRegionClient {
            http,
            region: region.clone(),
            identity,
            compute,
            signer,
            clock: Arc::clone(&self.clock),
        })
    }
}

/// Provider client bound to one region's identity and compute endpoints.
#[derive(Debug, Clone)]
pub struct OciRegionClient<K> {
    http: Client,
    region: RegionId,
    identity: Url,
    compute: Url,
    signer: RequestSigner,
    clock: Arc<K>,
}

impl<K> OciRegionClient<K>
where
    K: Clock + Send + Sync + 'static,
{
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> ProviderResult<Response> {
        let signed = self.signer.sign(&SignableRequest {
            method: &method,
            url: &url,
            date: self.clock.utc(),
            body: body.as_deref(),
        })?;

        let mut builder = self.http.request(method, url);
        for (name, value) in signed.headers {
            builder = builder.header(name, value);
        }
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|err| transport_error(&err))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let request_id = header_value(&response, REQUEST_ID_HEADER);
        let text = response.text().await.unwrap_or_default();
        let error = error_from_response(status, &text);
        debug!(
            region = %self.region,
            status = status.as_u16(),
            code = error.code(),
            request_id = request_id.as_deref().unwrap_or("-"),
            "provider request failed"
        );
        Err(error)
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> ProviderResult<(T, Option<String>)> {
        let response = self.send(Method::GET, url, None).await?;
        let next_page = header_value(&response, NEXT_PAGE_HEADER);
        let payload = response.json::<T>().await.map_err(|err| decode_error(&err))?;
        Ok((payload, next_page))
    }

    async fn compartment_page(&self, url: Url) -> ProviderResult<Page<Compartment>> {
        let (payloads, next_page) = self.fetch::<Vec<CompartmentPayload>>(url).await?;
        let items = payloads
            .into_iter()
            .map(CompartmentPayload::into_domain)
            .collect::<ProviderResult<Vec<_>>>()?;
        Ok(Page { items, next_page })
    }
}

#[async_trait]
impl<K> ProviderClient for OciRegionClient<K>
where
    K: Clock + Send + Sync + 'static,
{
    fn region(&self) -> &RegionId {
        &self.region
    }

    async fn list_compartments(
        &self,
        parent_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>> {
        let mut query = vec![("compartmentId", parent_id.as_str())];
        query.extend(page.map(|token| ("page", token)));
        let url = endpoint(&self.identity, &["compartments"], &query)?;
        self.compartment_page(url).await
    }

    async fn list_compartments_in_subtree(
        &self,
        root_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<Compartment>> {
        let mut query = vec![
            ("compartmentId", root_id.as_str()),
            ("compartmentIdInSubtree", "true"),
            ("accessLevel", "ACCESSIBLE"),
        ];
        query.extend(page.map(|token| ("page", token)));
        let url = endpoint(&self.identity, &["compartments"], &query)?;
        self.compartment_page(url).await
    }

    async fn get_compartment(&self, compartment_id: &CompartmentId) -> ProviderResult<Compartment> {
        let url = endpoint(&self.identity, &["compartments", compartment_id.as_str()], &[])?;
        let (payload, _) = self.fetch::<CompartmentPayload>(url).await?;
        payload.into_domain()
    }

    async fn list_instances(
        &self,
        compartment_id: &CompartmentId,
        page: Option<&str>,
    ) -> ProviderResult<Page<ComputeInstance>> {
        let mut query = vec![("compartmentId", compartment_id.as_str())];
        query.extend(page.map(|token| ("page", token)));
        let url = endpoint(&self.compute, &["instances"], &query)?;
        let (payloads, next_page) = self.fetch::<Vec<InstancePayload>>(url).await?;
        let items = payloads
            .into_iter()
            .map(|payload| {
                payload
                    .into_domain(&self.region)
                    .map(|full| full.summary())
            })
            .collect::<ProviderResult<Vec<_>>>()?;
        Ok(Page { items, next_page })
    }

    async fn get_instance(&self, instance_id: &InstanceId) -> ProviderResult<ComputeInstance> {
        let url = endpoint(&self.compute, &["instances", instance_id.as_str()], &[])?;
        let (payload, _) = self.fetch::<InstancePayload>(url).await?;
        payload.into_domain(&self.region)
    }

    async fn instance_action(
        &self,
        instance_id: &InstanceId,
        action: ProviderAction,
    ) -> ProviderResult<ComputeInstance> {
        let url = endpoint(
            &self.compute,
            &["instances", instance_id.as_str()],
            &[("action", action.as_str())],
        )?;
        let response = self.send(Method::POST, url, Some(Vec::new())).await?;
        let payload = response
            .json::<InstancePayload>()
            .await
            .map_err(|err| decode_error(&err))?;
        payload.into_domain(&self.region)
    }
}

fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> ProviderResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| {
            ProviderError::new(
                ProviderErrorKind::InvalidRequest,
                "InvalidEndpoint",
                format!("endpoint '{base}' cannot carry a path"),
            )
        })?
        .clear()
        .push(API_VERSION)
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn transport_error(err: &reqwest::Error) -> ProviderError {
    ProviderError::new(ProviderErrorKind::Unavailable, "RequestFailed", err.to_string())
}

fn decode_error(err: &reqwest::Error) -> ProviderError {
    ProviderError::new(
        ProviderErrorKind::Internal,
        "InvalidResponse",
        format!("unexpected provider payload: {err}"),
    )
}
