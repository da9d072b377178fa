use chrono::{Datelike, Utc};
use color_eyre::eyre::{eyre, OptionExt};
use color_eyre::Result;
use rand::{distributions::Alphanumeric, Rng};

use crate::db::models::{Certificate, CertificateParties};
use crate::db::Db;
use crate::names;

// ---------------------------------------------------------------------------
// CertificateStore trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait CertificateStore: Send + Sync {
    fn enrollment_parties(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<CertificateParties>>> + Send;

    fn insert_certificate(
        &self,
        enrollment_id: i64,
        certificate_no: &str,
        partner_name: &str,
        course_title: &str,
    ) -> impl std::future::Future<Output = Result<CertificateInsert>> + Send;

    fn stamp_enrollment_completed(
        &self,
        enrollment_id: i64,
        certificate_no: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn certificate_for_enrollment(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Certificate>>> + Send;
}

/// How an insert landed against the two unique constraints
/// (certificate number, one certificate per enrollment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateInsert {
    Inserted,
    NumberTaken,
    AlreadyCertified,
}

// ---------------------------------------------------------------------------
// CertificateService
// ---------------------------------------------------------------------------

pub struct CertificateService<S: CertificateStore = Db> {
    store: S,
}

impl<S: CertificateStore + Clone> Clone for CertificateService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: CertificateStore> CertificateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Issue a certificate for a completed enrollment and stamp the
    /// enrollment's completion. Idempotent: a second call (or a concurrent
    /// issuer) lands on the existing certificate instead of a duplicate.
    pub async fn issue(&self, enrollment_id: i64) -> Result<String> {
        if let Some(existing) = self.store.certificate_for_enrollment(enrollment_id).await? {
            return Ok(existing.certificate_no);
        }

        let parties = self
            .store
            .enrollment_parties(enrollment_id)
            .await?
            .ok_or_eyre("enrollment not found during certificate issuance")?;

        let year = Utc::now().year();

        for _ in 0..names::CERT_MINT_ATTEMPTS {
            let number = mint_number(year);

            match self
                .store
                .insert_certificate(
                    enrollment_id,
                    &number,
                    &parties.partner_name,
                    &parties.course_title,
                )
                .await?
            {
                CertificateInsert::Inserted => {
                    self.store
                        .stamp_enrollment_completed(enrollment_id, &number)
                        .await?;
                    tracing::info!(
                        "certificate issued: enrollment_id={enrollment_id}, number={number}"
                    );
                    return Ok(number);
                }
                CertificateInsert::NumberTaken => {
                    tracing::warn!("certificate number collision, minting again: {number}");
                }
                CertificateInsert::AlreadyCertified => {
                    // A concurrent issuer won. Reuse its number and make sure
                    // the enrollment got stamped.
                    let existing = self
                        .store
                        .certificate_for_enrollment(enrollment_id)
                        .await?
                        .ok_or_eyre("certificate missing after unique conflict")?;
                    self.store
                        .stamp_enrollment_completed(enrollment_id, &existing.certificate_no)
                        .await?;
                    return Ok(existing.certificate_no);
                }
            }
        }

        Err(eyre!(
            "could not mint a unique certificate number in {} attempts",
            names::CERT_MINT_ATTEMPTS
        ))
    }
}

/// `CERT-<year>-<9 uppercase alphanumeric chars>`
fn mint_number(year: i32) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(names::CERT_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!(
        "{}-{year}-{}",
        names::CERT_NUMBER_PREFIX,
        suffix.to_uppercase()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::views;

    fn parties() -> CertificateParties {
        CertificateParties {
            partner_name: "Acme Corp".to_string(),
            course_title: "Selling Widgets 101".to_string(),
        }
    }

    fn certificate(number: &str) -> Certificate {
        Certificate {
            id: 1,
            certificate_no: number.to_string(),
            enrollment_id: 42,
            partner_name: "Acme Corp".to_string(),
            course_title: "Selling Widgets 101".to_string(),
            completed_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            issued_at: Utc::now(),
        }
    }

    #[test]
    fn minted_numbers_have_the_documented_shape() {
        let number = mint_number(2025);
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CERT");
        assert_eq!(parts[1], "2025");
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn minted_numbers_vary() {
        let a = mint_number(2025);
        let b = mint_number(2025);
        assert_ne!(a, b);
    }

    #[test]
    fn document_carries_the_stored_fields_verbatim() {
        let cert = certificate("CERT-2025-ABCDEFGHI");
        let html = views::certificate::document(&cert).into_string();

        assert!(html.contains("Acme Corp"));
        assert!(html.contains("Selling Widgets 101"));
        assert!(html.contains("CERT-2025-ABCDEFGHI"));
        assert!(html.contains("March 1, 2025"));
    }

    #[test]
    fn document_rendering_is_deterministic() {
        let cert = certificate("CERT-2025-ABCDEFGHI");

        assert_eq!(
            views::certificate::document(&cert).into_string(),
            views::certificate::document(&cert).into_string(),
        );
    }

    #[tokio::test]
    async fn issue_inserts_and_stamps_the_enrollment() {
        let mut mock = MockCertificateStore::new();
        mock.expect_certificate_for_enrollment()
            .returning(|_| Box::pin(async { Ok(None) }));
        mock.expect_enrollment_parties()
            .returning(|_| Box::pin(async { Ok(Some(parties())) }));
        mock.expect_insert_certificate()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::Inserted) }));
        mock.expect_stamp_enrollment_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = CertificateService::new(mock);
        let number = svc.issue(42).await.unwrap();

        assert!(number.starts_with("CERT-"));
    }

    #[tokio::test]
    async fn issue_reuses_an_existing_certificate() {
        let mut mock = MockCertificateStore::new();
        mock.expect_certificate_for_enrollment()
            .returning(|_| Box::pin(async { Ok(Some(certificate("CERT-2025-ABCDEFGHI"))) }));
        // No insert expectation: issuing again must not touch the store.

        let svc = CertificateService::new(mock);
        let number = svc.issue(42).await.unwrap();

        assert_eq!(number, "CERT-2025-ABCDEFGHI");
    }

    #[tokio::test]
    async fn issue_retries_when_the_number_is_taken() {
        let mut mock = MockCertificateStore::new();
        mock.expect_certificate_for_enrollment()
            .returning(|_| Box::pin(async { Ok(None) }));
        mock.expect_enrollment_parties()
            .returning(|_| Box::pin(async { Ok(Some(parties())) }));
        mock.expect_insert_certificate()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::NumberTaken) }));
        mock.expect_insert_certificate()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::Inserted) }));
        mock.expect_stamp_enrollment_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = CertificateService::new(mock);
        assert!(svc.issue(42).await.is_ok());
    }

    #[tokio::test]
    async fn issue_gives_up_after_bounded_retries() {
        let mut mock = MockCertificateStore::new();
        mock.expect_certificate_for_enrollment()
            .returning(|_| Box::pin(async { Ok(None) }));
        mock.expect_enrollment_parties()
            .returning(|_| Box::pin(async { Ok(Some(parties())) }));
        mock.expect_insert_certificate()
            .times(names::CERT_MINT_ATTEMPTS)
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::NumberTaken) }));

        let svc = CertificateService::new(mock);
        assert!(svc.issue(42).await.is_err());
    }

    #[tokio::test]
    async fn issue_absorbs_a_concurrent_issuer() {
        let mut mock = MockCertificateStore::new();
        mock.expect_certificate_for_enrollment()
            .times(1)
            .returning(|_| Box::pin(async { Ok(None) }));
        mock.expect_enrollment_parties()
            .returning(|_| Box::pin(async { Ok(Some(parties())) }));
        mock.expect_insert_certificate()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::AlreadyCertified) }));
        mock.expect_certificate_for_enrollment()
            .times(1)
            .returning(|_| Box::pin(async { Ok(Some(certificate("CERT-2025-ZZZZZZZZZ"))) }));
        mock.expect_stamp_enrollment_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let svc = CertificateService::new(mock);
        let number = svc.issue(42).await.unwrap();

        assert_eq!(number, "CERT-2025-ZZZZZZZZZ");
    }
}
