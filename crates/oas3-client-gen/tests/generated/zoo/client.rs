//! HTTP client with one method per operation.
use oas3_client_gen_support as support;
use super::errors::Result;
use super::auth;
use super::models;
/// Client for Zoo (version 2.1.0).
#[derive(Debug, Clone)]
pub struct Client {
    core: support::ClientCore,
}
impl Client {
    /// First server URL declared by the API.
    pub const DEFAULT_BASE_URL: &'static str = "https://zoo.example.com/api";
    /// Creates a client for `base_url`. The credential is only sent to
    /// operations whose security schemes accept it.
    pub fn new(base_url: &str, credential: Option<support::Credential>) -> Result<Self> {
        Ok(Self {
            core: support::ClientCore::new(base_url, credential)?,
        })
    }
    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }
    /// `GET /animals`
    ///
    /// # Arguments
    ///
    /// - `ids`: Only return these animals
    pub async fn list_animals(&self, ids: Option<&[i64]>) -> Result<Vec<models::Animal>> {
        let mut parts = support::RequestParts::new();
        parts.query("ids", support::PairRule::Join(support::Delimiter::Pipe), &ids)?;
        let request = self.core.prepare(support::Method::GET, "/animals", parts, &[]);
        support::ClientCore::send_json(request).await
    }
    /// Look up an enclosure
    ///
    /// `GET /enclosures/{enclosureId}`
    ///
    /// # Errors
    ///
    /// - `404`: No such enclosure
    pub async fn get_enclosure(&self, enclosure_id: &str) -> Result<models::Enclosure> {
        let parts = support::RequestParts::new();
        let request = self
            .core
            .prepare(
                support::Method::GET,
                &format!(
                    "/enclosures/{}",
                    support::params::path_segment(
                        "enclosureId",
                        support::SegmentRule::Simple {
                            explode: false,
                        },
                        &enclosure_id,
                    )?,
                ),
                parts,
                &[auth::KEEPER],
            );
        support::ClientCore::send_json(request).await
    }
}
