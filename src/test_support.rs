use std::sync::{Arc, OnceLock};

use axum::Router;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api::ApiClient;
use crate::core::config::Settings;

const TESTIT_ENV_VARS: &[&str] = &[
    "TESTIT_API_URL",
    "NEXT_PUBLIC_URL",
    "TESTIT_ENV",
    "ENVIRONMENT",
    "TESTIT_STRICT_CONFIG",
    "TESTIT_REQUEST_TIMEOUT_SECONDS",
    "TESTIT_CONNECT_TIMEOUT_SECONDS",
    "TESTIT_MAX_UPLOAD_MB",
    "TESTIT_STALE_QUIZ_HOURS",
    "LOG_LEVEL",
    "LOG_JSON",
    "PROMETHEUS_ENABLED",
];

/// In-process stand-in for the Testit backend, listening on an ephemeral port.
pub(crate) struct TestBackend {
    pub(crate) client: ApiClient,
    pub(crate) settings: Settings,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn clear_testit_env() {
    for name in TESTIT_ENV_VARS {
        std::env::remove_var(name);
    }
}

pub(crate) async fn spawn_backend(router: Router) -> TestBackend {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake backend");
    });

    let settings = Settings::for_base_url(&format!("http://{addr}"));
    let client = ApiClient::from_settings(&settings).expect("api client");
    TestBackend { client, settings }
}
