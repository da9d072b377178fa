use chrono::NaiveDate;
use color_eyre::Result;
use ulid::Ulid;

use super::models::Deal;
use super::Db;

pub struct NewDeal {
    pub org_id: i64,
    pub registered_by: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub amount_cents: i64,
    pub stage: String,
    pub expected_close: NaiveDate,
    pub notes: String,
}

impl Db {
    pub async fn deals_for_org(&self, org_id: i64) -> Result<Vec<Deal>> {
        let deals =
            sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE org_id = $1 ORDER BY created_at DESC")
                .bind(org_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(deals)
    }

    pub async fn deal_for_org(&self, public_id: &str, org_id: i64) -> Result<Option<Deal>> {
        let deal =
            sqlx::query_as::<_, Deal>("SELECT * FROM deals WHERE public_id = $1 AND org_id = $2")
                .bind(public_id)
                .bind(org_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(deal)
    }

    /// Returns the new deal's public id.
    pub async fn create_deal(&self, deal: NewDeal) -> Result<String> {
        let public_id = Ulid::new().to_string();

        sqlx::query(
            r#"
            INSERT INTO deals
                (public_id, org_id, registered_by, customer_name, customer_email,
                 amount_cents, stage, expected_close, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&public_id)
        .bind(deal.org_id)
        .bind(deal.registered_by)
        .bind(&deal.customer_name)
        .bind(&deal.customer_email)
        .bind(deal.amount_cents)
        .bind(&deal.stage)
        .bind(deal.expected_close)
        .bind(&deal.notes)
        .execute(&self.pool)
        .await?;

        tracing::info!("deal registered: public_id={public_id}, org_id={}", deal.org_id);
        Ok(public_id)
    }

    /// Partners may only edit a registration while review is pending.
    pub async fn update_pending_deal(
        &self,
        public_id: &str,
        org_id: i64,
        customer_name: &str,
        customer_email: &str,
        amount_cents: i64,
        stage: &str,
        expected_close: NaiveDate,
        notes: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE deals
            SET customer_name = $1, customer_email = $2, amount_cents = $3,
                stage = $4, expected_close = $5, notes = $6, updated_at = now()
            WHERE public_id = $7 AND org_id = $8 AND status = 'pending'
            "#,
        )
        .bind(customer_name)
        .bind(customer_email)
        .bind(amount_cents)
        .bind(stage)
        .bind(expected_close)
        .bind(notes)
        .bind(public_id)
        .bind(org_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn pending_deals(&self) -> Result<Vec<Deal>> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT * FROM deals WHERE status = 'pending' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(deals)
    }

    pub async fn set_deal_status(&self, public_id: &str, status: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE deals SET status = $1, updated_at = now() WHERE public_id = $2",
        )
        .bind(status)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        tracing::info!("deal review decision: public_id={public_id}, status={status}");
        Ok(result.rows_affected() > 0)
    }
}
