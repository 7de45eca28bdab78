//! Row operations against the platform's REST row API
//!
//! Filters are PostgREST-style equality filters (`?col=eq.value`). Writes
//! that need the stored row back send `Prefer: return=representation` and
//! read the first element of the returned array.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::PlatformClient;
use crate::error::{BackendError, BackendResult};

impl PlatformClient {
    /// Select rows matching the given equality filters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let mut request = self.http().get(self.rest_url(table));
        for (column, value) in filters {
            request = request.query(&[(*column, format!("eq.{}", value))]);
        }
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Select at most one row matching the given equality filters.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> BackendResult<Option<T>> {
        Ok(self.select(table, filters).await?.into_iter().next())
    }

    /// Insert a row and return the stored representation.
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> BackendResult<R> {
        let request = self
            .http()
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(row);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let mut rows: Vec<R> = response.json().await?;
        if rows.is_empty() {
            return Err(BackendError::Malformed(format!(
                "insert into {} returned no representation",
                table
            )));
        }
        Ok(rows.remove(0))
    }

    /// Insert a row without asking for the representation back.
    pub async fn insert_row(&self, table: &str, row: &serde_json::Value) -> BackendResult<()> {
        let request = self
            .http()
            .post(self.rest_url(table))
            .header("Prefer", "return=minimal")
            .json(row);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(())
    }

    /// Insert-or-merge keyed on `on_conflict`.
    pub async fn upsert_row(
        &self,
        table: &str,
        on_conflict: &str,
        row: &serde_json::Value,
    ) -> BackendResult<()> {
        let request = self
            .http()
            .post(self.rest_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(())
    }

    /// Patch the row with the given id and return the stored representation.
    pub async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        id: i64,
        patch: &T,
    ) -> BackendResult<R> {
        let request = self
            .http()
            .patch(self.rest_url(table))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(patch);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        let mut rows: Vec<R> = response.json().await?;
        if rows.is_empty() {
            return Err(BackendError::Upstream {
                status: 404,
                code: Some("PGRST116".to_string()),
                message: format!("no row with id {} in {}", id, table),
            });
        }
        Ok(rows.remove(0))
    }

    /// Delete the row with the given id.
    pub async fn delete_by_id(&self, table: &str, id: i64) -> BackendResult<()> {
        let request = self
            .http()
            .delete(self.rest_url(table))
            .query(&[("id", format!("eq.{}", id))]);
        let response = self.authed(request).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::from_response(response).await);
        }
        Ok(())
    }

    /// Check whether a table exists by issuing a zero-row select.
    ///
    /// Returns `Ok(false)` on a missing relation; every other failure is a
    /// real error and propagates.
    pub async fn probe_table(&self, table: &str) -> BackendResult<bool> {
        let request = self
            .http()
            .get(self.rest_url(table))
            .query(&[("select", "id"), ("limit", "0")]);
        let response = self.authed(request).send().await?;
        if response.status().is_success() {
            return Ok(true);
        }
        let err = BackendError::from_response(response).await;
        if err.is_missing_relation() {
            Ok(false)
        } else {
            Err(err)
        }
    }
}
