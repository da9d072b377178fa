use color_eyre::Result;

use super::models::{Certificate, CertificateParties};
use super::Db;
use crate::services::certificate::{CertificateInsert, CertificateStore};

impl Db {
    /// Public verification lookup by certificate number.
    pub async fn certificate_by_number(&self, number: &str) -> Result<Option<Certificate>> {
        let certificate =
            sqlx::query_as::<_, Certificate>("SELECT * FROM certificates WHERE certificate_no = $1")
                .bind(number)
                .fetch_optional(&self.pool)
                .await?;
        Ok(certificate)
    }

    pub async fn certificates_for_user(&self, user_id: i64) -> Result<Vec<Certificate>> {
        let certificates = sqlx::query_as::<_, Certificate>(
            r#"
            SELECT c.* FROM certificates c
            JOIN enrollments e ON e.id = c.enrollment_id
            WHERE e.user_id = $1
            ORDER BY c.issued_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(certificates)
    }
}

impl CertificateStore for Db {
    fn enrollment_parties(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<CertificateParties>>> + Send {
        async move {
            let parties = sqlx::query_as::<_, CertificateParties>(
                r#"
                SELECT o.name AS partner_name, c.title AS course_title
                FROM enrollments e
                JOIN users u ON u.id = e.user_id
                JOIN organizations o ON o.id = u.org_id
                JOIN courses c ON c.id = e.course_id
                WHERE e.id = $1
                "#,
            )
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(parties)
        }
    }

    /// Insert maps unique-constraint violations to outcomes instead of errors
    /// so the caller can retry number collisions and absorb double issuance.
    fn insert_certificate(
        &self,
        enrollment_id: i64,
        certificate_no: &str,
        partner_name: &str,
        course_title: &str,
    ) -> impl std::future::Future<Output = Result<CertificateInsert>> + Send {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO certificates
                    (certificate_no, enrollment_id, partner_name, course_title, completed_on)
                VALUES ($1, $2, $3, $4, CURRENT_DATE)
                "#,
            )
            .bind(certificate_no)
            .bind(enrollment_id)
            .bind(partner_name)
            .bind(course_title)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => {
                    tracing::info!(
                        "certificate inserted: enrollment_id={enrollment_id}, number={certificate_no}"
                    );
                    Ok(CertificateInsert::Inserted)
                }
                Err(sqlx::Error::Database(e))
                    if e.constraint() == Some("certificates_certificate_no_key") =>
                {
                    Ok(CertificateInsert::NumberTaken)
                }
                Err(sqlx::Error::Database(e))
                    if e.constraint() == Some("certificates_enrollment_id_key") =>
                {
                    Ok(CertificateInsert::AlreadyCertified)
                }
                Err(e) => Err(e.into()),
            }
        }
    }

    fn stamp_enrollment_completed(
        &self,
        enrollment_id: i64,
        certificate_no: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            sqlx::query(
                r#"
                UPDATE enrollments
                SET completed_at = NOW(), certificate_no = $2
                WHERE id = $1 AND completed_at IS NULL
                "#,
            )
            .bind(enrollment_id)
            .bind(certificate_no)
            .execute(&self.pool)
            .await?;

            tracing::info!("enrollment completed: id={enrollment_id}, certificate={certificate_no}");
            Ok(())
        }
    }

    fn certificate_for_enrollment(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Certificate>>> + Send {
        async move {
            let certificate = sqlx::query_as::<_, Certificate>(
                "SELECT * FROM certificates WHERE enrollment_id = $1",
            )
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(certificate)
        }
    }
}
