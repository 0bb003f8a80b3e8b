//! Request signing with the caller's API key.
//!
//! Requests carry an HTTP `Signature` authorization over a fixed header list.
//! Body-carrying requests additionally sign their length, content type and
//! SHA-256 digest.

use crate::compute::ports::{ProviderError, ProviderErrorKind, ProviderResult};
use crate::config::{AuthMaterial, CredentialContext, SecretString};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use reqwest::{Method, Url};
use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};
use std::fmt;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Request parts covered by the signature.
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    /// HTTP method.
    pub method: &'a Method,
    /// Full request URL, including the query.
    pub url: &'a Url,
    /// Value of the `date` header.
    pub date: DateTime<Utc>,
    /// Request body; `None` for requests without one.
    pub body: Option<&'a [u8]>,
}

/// Headers to attach to a signed request, in signing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// Header names and values, `authorization` last.
    pub headers: Vec<(&'static str, String)>,
}

impl SignedHeaders {
    /// Returns the value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| *header == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Signs provider requests for one credential context.
#[derive(Clone)]
pub struct RequestSigner {
    key_id: String,
    key: SigningKey<Sha256>,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RequestSigner")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    /// Builds a signer from the context's credential material.
    ///
    /// # Errors
    ///
    /// Returns a `NotAuthorized` provider error when the private key cannot
    /// be decoded, including a missing or wrong pass phrase.
    pub fn from_context(context: &CredentialContext) -> ProviderResult<Self> {
        let (key_id, private_key) = match context.auth() {
            AuthMaterial::ApiKey {
                user,
                fingerprint,
                private_key,
                pass_phrase,
            } => (
                format!("{}/{user}/{fingerprint}", context.tenancy_id()),
                decode_private_key(private_key, pass_phrase.as_ref())?,
            ),
            AuthMaterial::SessionToken { token, private_key } => (
                format!("ST${}", token.expose()),
                decode_private_key(private_key, None)?,
            ),
        };
        Ok(Self {
            key_id,
            key: SigningKey::<Sha256>::new(private_key),
        })
    }

    /// Returns the key identifier placed in the authorization header.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Signs `request` and returns the headers to send with it.
    ///
    /// # Errors
    ///
    /// Returns a provider error when the URL has no host or signing fails.
    pub fn sign(&self, request: &SignableRequest<'_>) -> ProviderResult<SignedHeaders> {
        let mut headers = vec![
            ("date", request.date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()),
            ("(request-target)", request_target(request.method, request.url)),
            ("host", host(request.url)?),
        ];
        if let Some(body) = request.body {
            headers.push(("content-length", body.len().to_string()));
            headers.push(("content-type", JSON_CONTENT_TYPE.to_owned()));
            headers.push(("x-content-sha256", BASE64.encode(Sha256::digest(body))));
        }

        let signing_string = headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let signature: Signature = self
            .key
            .try_sign(signing_string.as_bytes())
            .map_err(|err| signing_error(&err))?;
        let names = headers
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(" ");
        let authorization = format!(
            r#"Signature version="1",keyId="{}",algorithm="rsa-sha256",headers="{names}",signature="{}""#,
            self.key_id,
            BASE64.encode(signature.to_bytes())
        );

        headers.retain(|(name, _)| *name != "(request-target)");
        headers.push(("authorization", authorization));
        Ok(SignedHeaders { headers })
    }
}

fn decode_private_key(
    pem: &SecretString,
    pass_phrase: Option<&SecretString>,
) -> ProviderResult<RsaPrivateKey> {
    let text = pem.expose();
    let decoded = if text.contains("BEGIN ENCRYPTED PRIVATE KEY") {
        let Some(phrase) = pass_phrase else {
            return Err(key_error(
                "the private key is encrypted but no pass_phrase is configured",
            ));
        };
        RsaPrivateKey::from_pkcs8_encrypted_pem(text, phrase.expose().as_bytes())
            .map_err(|err| err.to_string())
    } else if text.contains("BEGIN RSA PRIVATE KEY") {
        RsaPrivateKey::from_pkcs1_pem(text).map_err(|err| err.to_string())
    } else {
        RsaPrivateKey::from_pkcs8_pem(text).map_err(|err| err.to_string())
    };
    decoded.map_err(|reason| key_error(&format!("cannot decode the API signing key: {reason}")))
}

fn request_target(method: &Method, url: &Url) -> String {
    let method_name = method.as_str().to_ascii_lowercase();
    url.query().map_or_else(
        || format!("{method_name} {}", url.path()),
        |query| format!("{method_name} {}?{query}", url.path()),
    )
}

fn host(url: &Url) -> ProviderResult<String> {
    let name = url.host_str().ok_or_else(|| {
        ProviderError::new(
            ProviderErrorKind::InvalidRequest,
            "InvalidEndpoint",
            format!("endpoint '{url}' has no host"),
        )
    })?;
    Ok(url
        .port()
        .map_or_else(|| name.to_owned(), |port| format!("{name}:{port}")))
}

fn key_error(message: &str) -> ProviderError {
    ProviderError::new(ProviderErrorKind::NotAuthorized, "InvalidPrivateKey", message)
}

fn signing_error(err: &rsa::signature::Error) -> ProviderError {
    ProviderError::new(
        ProviderErrorKind::Internal,
        "SigningFailed",
        format!("failed to sign request: {err}"),
    )
}
