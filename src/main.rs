use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tts_relay::controllers::{stats::StatsController, tts::TtsController};
use tts_relay::domain::tts::{TtsService, VoiceTable};
use tts_relay::domain::usage::UsageService;
use tts_relay::infrastructure::config::{Config, CounterStoreKind, LogFormat};
use tts_relay::infrastructure::db::create_pool;
use tts_relay::infrastructure::http::{create_router, start_http_server};
use tts_relay::infrastructure::repositories::{
    AzureTtsRepository, CounterRepository, EspeakTtsRepository, GoogleTranslateTtsRepository,
    InMemoryCounterRepository, JsonFileCounterRepository, NoopCounterRepository,
    PollyTtsRepository, PostgresCounterRepository, TtsRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting TTS relay on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Voice table
    let voice_table = match &config.voice_table_path {
        Some(path) => {
            let table = VoiceTable::from_json_file(path)?;
            tracing::info!(path = %path.display(), entries = table.len(), "Voice table loaded from file");
            table
        }
        None => {
            let table = VoiceTable::builtin();
            tracing::info!(entries = table.len(), "Using built-in voice table");
            table
        }
    };

    // 2. Counter store
    tracing::info!(store = ?config.counter_store, "Instantiating counter store...");
    let counters = build_counter_store(&config).await?;

    // 3. Synthesis engines, in fallback order
    tracing::info!("Instantiating synthesis engines...");
    let adapters = build_adapters(&config).await?;
    if adapters.is_empty() {
        tracing::warn!("No synthesis engine is enabled; every conversion will fail");
    }

    tokio::fs::create_dir_all(&config.scratch_dir).await?;
    tracing::info!(scratch_dir = %config.scratch_dir.display(), "Scratch directory ready");

    // 4. Instantiate services
    tracing::info!("Instantiating services...");
    let usage_service = Arc::new(UsageService::new(counters));
    let tts_service = Arc::new(TtsService::new(
        Arc::new(voice_table),
        adapters,
        usage_service.clone(),
        config.dispatcher_settings(),
    ));
    tracing::info!(engines = ?tts_service.engine_names(), "Synthesis chain configured");

    // 5. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let stats_controller = Arc::new(StatsController::new(usage_service));

    let config = Arc::new(config);
    let app = create_router(tts_controller, stats_controller);

    start_http_server(config, app).await?;

    Ok(())
}

async fn build_counter_store(config: &Config) -> Result<Arc<dyn CounterRepository>, Box<dyn std::error::Error>> {
    let store: Arc<dyn CounterRepository> = match config.counter_store {
        CounterStoreKind::None => Arc::new(NoopCounterRepository),
        CounterStoreKind::Memory => Arc::new(InMemoryCounterRepository::new()),
        CounterStoreKind::Json => {
            tracing::info!(path = %config.stats_file.display(), "Using JSON file counter store");
            Arc::new(JsonFileCounterRepository::new(config.stats_file.clone()))
        }
        CounterStoreKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("COUNTER_STORE=postgres requires DATABASE_URL")?;
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            let repo = PostgresCounterRepository::new(Arc::new(pool));
            repo.ensure_schema().await?;
            tracing::info!("Usage counter tables verified");
            Arc::new(repo)
        }
    };

    Ok(store)
}

async fn build_adapters(config: &Config) -> Result<Vec<Arc<dyn TtsRepository>>, Box<dyn std::error::Error>> {
    let mut adapters: Vec<Arc<dyn TtsRepository>> = Vec::new();

    if let Some(key) = &config.azure_speech_key {
        adapters.push(Arc::new(AzureTtsRepository::new(
            key.clone(),
            &config.azure_speech_region,
            config.adapter_timeout(),
        )?));
        tracing::info!(region = %config.azure_speech_region, "Azure neural voices enabled");
    }

    if config.polly_enabled {
        tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

        let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
        let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
        if !has_access_key || !has_secret_key {
            tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
        }

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
        adapters.push(Arc::new(PollyTtsRepository::new(polly_client)));
        tracing::info!("AWS Polly client initialized successfully");
    }

    if config.gtts_enabled {
        adapters.push(Arc::new(GoogleTranslateTtsRepository::new(config.adapter_timeout())?));
        tracing::info!("Google Translate TTS enabled");
    }

    if config.espeak_enabled {
        match EspeakTtsRepository::locate(config.espeak_path.as_deref()) {
            Some(binary) => {
                tracing::info!(binary = %binary.display(), "eSpeak NG enabled");
                adapters.push(Arc::new(EspeakTtsRepository::new(binary)));
            }
            None => tracing::warn!("eSpeak NG binary not found; offline engine disabled"),
        }
    }

    Ok(adapters)
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "tts_relay=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
