use reqwest::{Client, Response};
use uuid::Uuid;

use bacheca_types::api::{ClearAllResponse, CreateNoteRequest, WriteItemRequest};
use bacheca_types::models::{Note, ShoppingItem};

use crate::error::{ClientError, Result};

/// Thin wrapper over the backend's REST surface. One instance per client;
/// cheap to clone, shares the underlying connection pool.
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    family_key: String,
}

impl RestClient {
    pub fn new(base_url: &str, family_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            family_key: family_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn family_key(&self) -> &str {
        &self.family_key
    }

    // -- Shopping list --

    pub async fn list_items(&self) -> Result<Vec<ShoppingItem>> {
        let resp = self
            .http
            .get(format!("{}/shopping/items", self.base_url))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        Ok(checked(resp)?.json().await?)
    }

    pub async fn write_item(&self, id: u32, req: &WriteItemRequest) -> Result<ShoppingItem> {
        let resp = self
            .http
            .put(format!("{}/shopping/items/{}", self.base_url, id))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .json(req)
            .send()
            .await?;
        Ok(checked(resp)?.json().await?)
    }

    pub async fn toggle_item(&self, id: u32) -> Result<ShoppingItem> {
        let resp = self
            .http
            .post(format!("{}/shopping/items/{}/toggle", self.base_url, id))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        Ok(checked(resp)?.json().await?)
    }

    pub async fn delete_item(&self, id: u32) -> Result<()> {
        let resp = self
            .http
            .delete(format!("{}/shopping/items/{}", self.base_url, id))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        checked(resp)?;
        Ok(())
    }

    pub async fn clear_items(&self) -> Result<u32> {
        let resp = self
            .http
            .delete(format!("{}/shopping/items", self.base_url))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        let body: ClearAllResponse = checked(resp)?.json().await?;
        Ok(body.deleted)
    }

    // -- Notes --

    pub async fn list_notes(&self) -> Result<Vec<Note>> {
        let resp = self
            .http
            .get(format!("{}/notes", self.base_url))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        Ok(checked(resp)?.json().await?)
    }

    pub async fn create_note(&self, req: &CreateNoteRequest) -> Result<Note> {
        let resp = self
            .http
            .post(format!("{}/notes", self.base_url))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .json(req)
            .send()
            .await?;
        Ok(checked(resp)?.json().await?)
    }

    pub async fn delete_note(&self, id: Uuid) -> Result<()> {
        let resp = self
            .http
            .delete(format!("{}/notes/{}", self.base_url, id))
            .header("Authorization", format!("Bearer {}", self.family_key))
            .send()
            .await?;
        checked(resp)?;
        Ok(())
    }
}

fn checked(resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status(resp.status()))
    }
}
