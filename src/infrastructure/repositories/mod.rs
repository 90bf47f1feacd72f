pub mod azure_tts_repository;
pub mod batching;
pub mod counter_repository;
pub mod espeak_tts_repository;
pub mod gtts_repository;
pub mod json_counter_repository;
pub mod memory_counter_repository;
pub mod polly_tts_repository;
pub mod postgres_counter_repository;
pub mod tts_repository;

pub use azure_tts_repository::AzureTtsRepository;
pub use counter_repository::{CounterRepository, CounterStoreError, NoopCounterRepository};
pub use espeak_tts_repository::EspeakTtsRepository;
pub use gtts_repository::GoogleTranslateTtsRepository;
pub use json_counter_repository::JsonFileCounterRepository;
pub use memory_counter_repository::InMemoryCounterRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use postgres_counter_repository::PostgresCounterRepository;
pub use tts_repository::{AdapterError, TtsRepository};
