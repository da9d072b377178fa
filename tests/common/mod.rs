use partnerhub::{
    db::Db,
    services::{auth::AuthService, certificate::CertificateService, progress::ProgressService},
    storage::DiskStore,
    AppState,
};

/// Application state over a pool that never connects. Session guards and the
/// CSRF check run before any query, so routing tests need no live database.
pub fn test_state() -> AppState {
    let db = Db::connect_lazy("postgres://127.0.0.1:1/partnerhub_test")
        .expect("failed to build lazy pool");
    let data_dir = std::env::temp_dir().join(format!("partnerhub_test_{}", std::process::id()));
    AppState {
        auth: AuthService::new(db.clone()),
        progress: ProgressService::new(db.clone(), CertificateService::new(db.clone())),
        storage: DiskStore::new(data_dir),
        secure_cookies: false,
        db,
    }
}
