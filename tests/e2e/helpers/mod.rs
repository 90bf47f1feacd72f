use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use tts_relay::controllers::{stats::StatsController, tts::TtsController};
use tts_relay::domain::tts::{DispatcherSettings, TtsService, VoiceTable};
use tts_relay::domain::usage::UsageService;
use tts_relay::infrastructure::http::create_router;
use tts_relay::infrastructure::repositories::{InMemoryCounterRepository, TtsRepository};

pub mod api_client;
pub mod stubs;

use api_client::TestClient;
use stubs::{StubBehavior, StubTtsRepository};

/// Size of the artifact produced by the default stub engine
pub const STUB_AUDIO_BYTES: usize = 5000;

/// A running server plus the handles tests need to inspect it
pub struct TestApp {
    pub client: TestClient,
    #[allow(dead_code)]
    pub counters: Arc<InMemoryCounterRepository>,
    pub scratch: TempDir,
}

impl TestApp {
    /// Spawn the router with the given engine chain
    pub async fn spawn(adapters: Vec<Arc<dyn TtsRepository>>) -> TestApp {
        let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
        let counters = Arc::new(InMemoryCounterRepository::new());

        let settings = DispatcherSettings {
            scratch_dir: scratch.path().to_path_buf(),
            adapter_timeout: Duration::from_secs(2),
            // Disable cache in tests to avoid test pollution
            preview_cache_enabled: false,
            ..Default::default()
        };

        let usage_service = Arc::new(UsageService::new(counters.clone()));
        let tts_service = Arc::new(TtsService::new(
            Arc::new(VoiceTable::builtin()),
            adapters,
            usage_service.clone(),
            settings,
        ));

        let app = create_router(
            Arc::new(TtsController::new(tts_service)),
            Arc::new(StatsController::new(usage_service)),
        );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(50)).await;

        TestApp {
            client: TestClient::new(&base_url),
            counters,
            scratch,
        }
    }

    /// True when no scratch artifact outlived its request
    pub fn scratch_is_empty(&self) -> bool {
        std::fs::read_dir(self.scratch.path())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }
}

/// Default fixture: a single engine named `stub` that always succeeds
pub struct TestContext {
    pub app: TestApp,
    pub client: TestClient,
    pub engine: Arc<StubTtsRepository>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let engine = StubTtsRepository::new("stub", StubBehavior::Succeed(STUB_AUDIO_BYTES));
            let app = TestApp::spawn(vec![engine.clone()]).await;
            let client = app.client.clone();

            Self { app, client, engine }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Scratch directory is removed when TempDir drops
        }
    }
}
