//! Centre and séjour repositories

use std::sync::Arc;

use colo_core::types::{Centre, Sejour};

use crate::client::PlatformClient;
use crate::error::BackendResult;

pub const CENTRES_TABLE: &str = "centres";
pub const SEJOURS_TABLE: &str = "sejours";

pub struct CentreRepo {
    client: Arc<PlatformClient>,
}

impl CentreRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> BackendResult<Vec<Centre>> {
        self.client.select(CENTRES_TABLE, &[]).await
    }

    pub async fn get(&self, id: i64) -> BackendResult<Option<Centre>> {
        self.client
            .select_one(CENTRES_TABLE, &[("id", id.to_string())])
            .await
    }

    pub async fn create(&self, centre: &Centre) -> BackendResult<Centre> {
        self.client.insert(CENTRES_TABLE, centre).await
    }
}

pub struct SejourRepo {
    client: Arc<PlatformClient>,
}

impl SejourRepo {
    pub fn new(client: Arc<PlatformClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, centre_id: Option<i64>) -> BackendResult<Vec<Sejour>> {
        match centre_id {
            Some(id) => {
                self.client
                    .select(SEJOURS_TABLE, &[("centre_id", id.to_string())])
                    .await
            }
            None => self.client.select(SEJOURS_TABLE, &[]).await,
        }
    }

    pub async fn get(&self, id: i64) -> BackendResult<Option<Sejour>> {
        self.client
            .select_one(SEJOURS_TABLE, &[("id", id.to_string())])
            .await
    }

    pub async fn create(&self, sejour: &Sejour) -> BackendResult<Sejour> {
        self.client.insert(SEJOURS_TABLE, sejour).await
    }
}
