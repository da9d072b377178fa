use color_eyre::Result;

use super::models::Article;
use super::Db;

impl Db {
    /// Published articles visible to the given tiers, newest first per category.
    pub async fn articles_for_tiers(&self, tiers: &[String]) -> Result<Vec<Article>> {
        let articles = sqlx::query_as::<_, Article>(
            r#"
            SELECT * FROM articles
            WHERE published AND min_tier = ANY($1)
            ORDER BY category, updated_at DESC
            "#,
        )
        .bind(tiers)
        .fetch_all(&self.pool)
        .await?;
        Ok(articles)
    }

    pub async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    pub async fn all_articles(&self) -> Result<Vec<Article>> {
        let articles =
            sqlx::query_as::<_, Article>("SELECT * FROM articles ORDER BY category, title")
                .fetch_all(&self.pool)
                .await?;
        Ok(articles)
    }

    pub async fn article_slug_exists(&self, slug: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create_article(
        &self,
        slug: &str,
        title: &str,
        body: &str,
        category: &str,
        min_tier: &str,
    ) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (slug, title, body, category, min_tier)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(body)
        .bind(category)
        .bind(min_tier)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("article created: id={id}, slug={slug}");
        Ok(id)
    }

    pub async fn article_by_id(&self, id: i64) -> Result<Option<Article>> {
        let article = sqlx::query_as::<_, Article>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(article)
    }

    pub async fn update_article(
        &self,
        id: i64,
        title: &str,
        body: &str,
        category: &str,
        min_tier: &str,
        published: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE articles
            SET title = $1, body = $2, category = $3, min_tier = $4,
                published = $5, updated_at = now()
            WHERE id = $6
            "#,
        )
        .bind(title)
        .bind(body)
        .bind(category)
        .bind(min_tier)
        .bind(published)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("article updated: id={id}");
        Ok(())
    }

    pub async fn delete_article(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("article deleted: id={id}");
        Ok(())
    }
}
