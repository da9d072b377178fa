use color_eyre::{eyre::OptionExt, Result};

use super::models::{AdminQueueCounts, DashboardCounts, Organization};
use super::Db;

impl Db {
    pub async fn organization(&self, org_id: i64) -> Result<Organization> {
        sqlx::query_as::<_, Organization>("SELECT id, name, tier FROM organizations WHERE id = $1")
            .bind(org_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_eyre("organization not found")
    }

    pub async fn set_org_tier(&self, org_id: i64, tier: &str) -> Result<()> {
        sqlx::query("UPDATE organizations SET tier = $1 WHERE id = $2")
            .bind(tier)
            .bind(org_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("organization tier updated: org_id={org_id}, tier={tier}");
        Ok(())
    }

    pub async fn organizations(&self) -> Result<Vec<Organization>> {
        let orgs = sqlx::query_as::<_, Organization>(
            "SELECT id, name, tier FROM organizations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orgs)
    }

    pub async fn org_dashboard_counts(&self, org_id: i64, user_id: i64) -> Result<DashboardCounts> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM deals
                 WHERE org_id = $1 AND status <> 'rejected'
                   AND stage NOT IN ('closed_won', 'closed_lost')) AS open_deals,
                (SELECT COUNT(*) FROM tickets
                 WHERE org_id = $1 AND status <> 'closed') AS open_tickets,
                (SELECT COUNT(*) FROM mdf_requests
                 WHERE org_id = $1 AND status = 'pending') AS pending_mdf,
                (SELECT COUNT(*) FROM enrollments
                 WHERE user_id = $2 AND completed_at IS NULL) AS courses_in_progress
            "#,
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn admin_queue_counts(&self) -> Result<AdminQueueCounts> {
        let counts = sqlx::query_as::<_, AdminQueueCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM deals WHERE status = 'pending') AS pending_deals,
                (SELECT COUNT(*) FROM tickets WHERE status = 'open') AS open_tickets,
                (SELECT COUNT(*) FROM mdf_requests WHERE status = 'pending') AS pending_mdf,
                (SELECT COUNT(*) FROM courses) AS courses
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }
}
