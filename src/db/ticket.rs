use color_eyre::Result;
use ulid::Ulid;

use super::models::{Ticket, TicketReply};
use super::Db;

impl Db {
    pub async fn tickets_for_org(&self, org_id: i64) -> Result<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE org_id = $1 ORDER BY updated_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    pub async fn ticket_for_org(&self, public_id: &str, org_id: i64) -> Result<Option<Ticket>> {
        let ticket =
            sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE public_id = $1 AND org_id = $2")
                .bind(public_id)
                .bind(org_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(ticket)
    }

    pub async fn ticket_by_public_id(&self, public_id: &str) -> Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>("SELECT * FROM tickets WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    /// Returns the new ticket's public id.
    pub async fn open_ticket(
        &self,
        org_id: i64,
        opened_by: i64,
        subject: &str,
        body: &str,
        priority: &str,
    ) -> Result<String> {
        let public_id = Ulid::new().to_string();

        sqlx::query(
            r#"
            INSERT INTO tickets (public_id, org_id, opened_by, subject, body, priority)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&public_id)
        .bind(org_id)
        .bind(opened_by)
        .bind(subject)
        .bind(body)
        .bind(priority)
        .execute(&self.pool)
        .await?;

        tracing::info!("ticket opened: public_id={public_id}, org_id={org_id}");
        Ok(public_id)
    }

    pub async fn ticket_replies(&self, ticket_id: i64) -> Result<Vec<TicketReply>> {
        let replies = sqlx::query_as::<_, TicketReply>(
            r#"
            SELECT r.id, r.ticket_id, u.display_name AS author_name,
                   u.is_admin AS author_is_admin, r.body, r.created_at
            FROM ticket_replies r
            JOIN users u ON u.id = r.author_id
            WHERE r.ticket_id = $1
            ORDER BY r.created_at
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(replies)
    }

    /// Append a reply and flip the ticket's status: a partner reply puts the
    /// ticket back in the support queue, an admin reply hands it to the partner.
    pub async fn add_ticket_reply(
        &self,
        ticket_id: i64,
        author_id: i64,
        body: &str,
        author_is_admin: bool,
    ) -> Result<()> {
        let status = if author_is_admin { "pending" } else { "open" };

        sqlx::query("INSERT INTO ticket_replies (ticket_id, author_id, body) VALUES ($1, $2, $3)")
            .bind(ticket_id)
            .bind(author_id)
            .bind(body)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "UPDATE tickets SET status = $1, updated_at = now() WHERE id = $2 AND status <> 'closed'",
        )
        .bind(status)
        .bind(ticket_id)
        .execute(&self.pool)
        .await?;

        tracing::info!("ticket reply added: ticket_id={ticket_id}, author_id={author_id}");
        Ok(())
    }

    pub async fn close_ticket(&self, ticket_id: i64) -> Result<()> {
        sqlx::query("UPDATE tickets SET status = 'closed', updated_at = now() WHERE id = $1")
            .bind(ticket_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("ticket closed: ticket_id={ticket_id}");
        Ok(())
    }

    pub async fn open_tickets(&self) -> Result<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(
            r#"
            SELECT * FROM tickets
            WHERE status <> 'closed'
            ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'normal' THEN 1 ELSE 2 END,
                     updated_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }
}
