//! HTTP client with one method per operation.
use oas3_client_gen_support as support;
use super::errors::Result;
use super::auth;
use super::models;
/// Client for Swagger Petstore (version 1.0.0).
#[derive(Debug, Clone)]
pub struct Client {
    core: support::ClientCore,
}
impl Client {
    /// First server URL declared by the API.
    pub const DEFAULT_BASE_URL: &'static str = "https://petstore.example.com/v1";
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
    /// List all pets
    ///
    /// `GET /pets`
    ///
    /// # Arguments
    ///
    /// - `limit`: How many items to return at one time (max 100)
    ///
    /// # Errors
    ///
    /// - `default`: unexpected error
    pub async fn list_pets(
        &self,
        limit: Option<i32>,
        tags: Option<&[String]>,
    ) -> Result<Vec<models::Pet>> {
        let mut parts = support::RequestParts::new();
        parts.query("limit", support::PairRule::Single, &limit)?;
        parts.query("tags", support::PairRule::Join(support::Delimiter::Comma), &tags)?;
        let request = self
            .core
            .prepare(support::Method::GET, "/pets", parts, &[auth::API_KEY]);
        support::ClientCore::send_json(request).await
    }
    /// Create a pet
    ///
    /// `POST /pets`
    pub async fn create_pet(&self, body: &models::NewPet) -> Result<models::Pet> {
        let parts = support::RequestParts::new();
        let request = self
            .core
            .prepare(support::Method::POST, "/pets", parts, &[auth::API_KEY]);
        let request = support::ClientCore::json_body(request, &body, "application/json")?;
        support::ClientCore::send_json(request).await
    }
    /// Info for a specific pet
    ///
    /// `GET /pets/{petId}`
    ///
    /// # Arguments
    ///
    /// - `pet_id`: The id of the pet to retrieve
    ///
    /// # Errors
    ///
    /// - `404`: Pet not found
    pub async fn show_pet_by_id(&self, pet_id: i64) -> Result<models::Pet> {
        let parts = support::RequestParts::new();
        let request = self
            .core
            .prepare(
                support::Method::GET,
                &format!(
                    "/pets/{}",
                    support::params::path_segment(
                        "petId",
                        support::SegmentRule::Simple {
                            explode: false,
                        },
                        &pet_id,
                    )?,
                ),
                parts,
                &[auth::API_KEY],
            );
        support::ClientCore::send_json(request).await
    }
    /// `DELETE /pets/{petId}`
    ///
    /// # Arguments
    ///
    /// - `pet_id`: The id of the pet to retrieve
    pub async fn delete_pets_pet_id(&self, pet_id: i64) -> Result<()> {
        let parts = support::RequestParts::new();
        let request = self
            .core
            .prepare(
                support::Method::DELETE,
                &format!(
                    "/pets/{}",
                    support::params::path_segment(
                        "petId",
                        support::SegmentRule::Simple {
                            explode: false,
                        },
                        &pet_id,
                    )?,
                ),
                parts,
                &[auth::API_KEY],
            );
        support::ClientCore::send_empty(request).await
    }
}
