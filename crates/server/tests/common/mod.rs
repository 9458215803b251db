#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use guess_core::domain::{
    Answer, AnswerName, Difficulty, Image, ImageSource, SearchQuery, SourcingError,
};
use guess_server::api::AppState;
use guess_server::build_state;
use guess_server::config::ServerConfig;
use guess_server::db::init_pool_and_migrate;
use guess_server::media::MediaStore;
use guess_server::repository::{
    AnswerRepository, ImageRepository, NewAnswer, NewImage, SeaOrmAnswerRepository,
    SeaOrmImageRepository,
};
use sea_orm::DatabaseConnection;

/// 用于测试的图片来源，按预设返回搜索结果和下载内容。
pub struct FakeImageSource {
    links: Vec<String>,
    payloads: Vec<Vec<u8>>,
    search_error: Option<SourcingError>,
    search_calls: AtomicUsize,
    download_calls: AtomicUsize,
}

impl FakeImageSource {
    pub fn returning(links: &[&str], payloads: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            links: links.iter().map(|link| link.to_string()).collect(),
            payloads,
            search_error: None,
            search_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::returning(&[], Vec::new())
    }

    pub fn failing(error: SourcingError) -> Arc<Self> {
        Arc::new(Self {
            links: Vec::new(),
            payloads: Vec::new(),
            search_error: Some(error),
            search_calls: AtomicUsize::new(0),
            download_calls: AtomicUsize::new(0),
        })
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for FakeImageSource {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<String>, SourcingError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        match &self.search_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.links.clone()),
        }
    }

    async fn download(&self, _links: Vec<String>) -> Vec<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.clone()
    }
}

pub struct TestApp {
    pub db: DatabaseConnection,
    pub state: Arc<AppState>,
    pub media_root: PathBuf,
}

impl TestApp {
    pub async fn new(source: Arc<dyn ImageSource>) -> Self {
        Self::with_env(source, &[]).await
    }

    pub async fn with_env(source: Arc<dyn ImageSource>, extra: &[(&str, &str)]) -> Self {
        let media_root =
            std::env::temp_dir().join(format!("guess-test-media-{}", uuid::Uuid::new_v4()));
        let media_root_str = media_root.to_string_lossy().to_string();

        let mut vars: Vec<(String, String)> = vec![
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("MEDIA_ROOT".to_string(), media_root_str),
        ];
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        let config = ServerConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .expect("test config should load");

        let db = init_pool_and_migrate(&config.database_url)
            .await
            .expect("in-memory database should migrate");
        let state = build_state(&config, db.clone(), source).expect("state should build");

        Self {
            db,
            state,
            media_root,
        }
    }

    pub fn answers(&self) -> SeaOrmAnswerRepository {
        SeaOrmAnswerRepository::new(self.db.clone())
    }

    pub fn images(&self) -> SeaOrmImageRepository {
        SeaOrmImageRepository::new(self.db.clone())
    }

    pub fn media(&self) -> MediaStore {
        MediaStore::new(self.media_root.clone())
    }

    pub async fn add_answer(&self, name: &str, difficulty: Difficulty) -> Answer {
        self.answers()
            .create(NewAnswer {
                name: AnswerName::new(name).expect("valid answer name"),
                difficulty,
            })
            .await
            .expect("answer should be inserted")
    }

    pub async fn add_image(&self, answer: &Answer, payload: &[u8]) -> Image {
        let path = self
            .media()
            .save(&answer.name, payload)
            .await
            .expect("payload should be stored");

        self.images()
            .create(NewImage {
                answer_id: answer.id,
                path,
            })
            .await
            .expect("image should be inserted")
    }

    pub async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(&self.media_root).await;
    }
}

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
