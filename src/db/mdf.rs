use color_eyre::Result;
use sqlx::types::Json;
use ulid::Ulid;

use super::models::MdfRequest;
use super::Db;

pub struct NewMdfRequest {
    pub org_id: i64,
    pub requested_by: i64,
    pub campaign_name: String,
    pub description: String,
    pub amount_cents: i64,
    pub roi_metrics: serde_json::Value,
}

impl Db {
    pub async fn mdf_requests_for_org(&self, org_id: i64) -> Result<Vec<MdfRequest>> {
        let requests = sqlx::query_as::<_, MdfRequest>(
            "SELECT * FROM mdf_requests WHERE org_id = $1 ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn mdf_request_for_org(
        &self,
        public_id: &str,
        org_id: i64,
    ) -> Result<Option<MdfRequest>> {
        let request = sqlx::query_as::<_, MdfRequest>(
            "SELECT * FROM mdf_requests WHERE public_id = $1 AND org_id = $2",
        )
        .bind(public_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn create_mdf_request(&self, new: NewMdfRequest) -> Result<String> {
        let public_id = Ulid::new().to_string();

        sqlx::query(
            r#"
            INSERT INTO mdf_requests
                (public_id, org_id, requested_by, campaign_name, description, amount_cents, roi_metrics)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&public_id)
        .bind(new.org_id)
        .bind(new.requested_by)
        .bind(&new.campaign_name)
        .bind(&new.description)
        .bind(new.amount_cents)
        .bind(Json(&new.roi_metrics))
        .execute(&self.pool)
        .await?;

        tracing::info!("mdf request created: public_id={public_id}, org_id={}", new.org_id);
        Ok(public_id)
    }

    pub async fn pending_mdf_requests(&self) -> Result<Vec<MdfRequest>> {
        let requests = sqlx::query_as::<_, MdfRequest>(
            "SELECT * FROM mdf_requests WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn mdf_request_by_public_id(&self, public_id: &str) -> Result<Option<MdfRequest>> {
        let request =
            sqlx::query_as::<_, MdfRequest>("SELECT * FROM mdf_requests WHERE public_id = $1")
                .bind(public_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(request)
    }

    /// Approve or reject a pending request. Decided requests stay decided.
    pub async fn decide_mdf_request(
        &self,
        public_id: &str,
        status: &str,
        decided_by: i64,
        note: Option<&str>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE mdf_requests
            SET status = $2, decided_by = $3, decision_note = $4, decided_at = NOW()
            WHERE public_id = $1 AND status = 'pending'
            "#,
        )
        .bind(public_id)
        .bind(status)
        .bind(decided_by)
        .bind(note)
        .execute(&self.pool)
        .await?;

        let decided = result.rows_affected() > 0;
        if decided {
            tracing::info!("mdf request decided: public_id={public_id}, status={status}");
        }
        Ok(decided)
    }
}
