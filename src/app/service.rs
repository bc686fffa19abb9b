//! Orchestration of the listing, enrichment and download stages
//!
//! [`DownloadService`] composes the four capabilities by constructor
//! injection. Retries live in the downloader only; every entry point here
//! is a straight pipeline returning one summarizing result.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::models::Item;
use crate::app::traits::{Downloader, ItemScraper, ItemStore};
use crate::errors::{AppError, Result};

/// Pipeline over a scraper, a store and a downloader
#[derive(Clone)]
pub struct DownloadService {
    scraper: Arc<dyn ItemScraper>,
    store: Arc<dyn ItemStore>,
    downloader: Arc<dyn Downloader>,
}

impl DownloadService {
    /// Compose a service from its capabilities
    pub fn new(
        scraper: Arc<dyn ItemScraper>,
        store: Arc<dyn ItemStore>,
        downloader: Arc<dyn Downloader>,
    ) -> Self {
        Self {
            scraper,
            store,
            downloader,
        }
    }

    /// The downloader, e.g. to register a progress callback
    pub fn downloader(&self) -> &Arc<dyn Downloader> {
        &self.downloader
    }

    /// Download every clip that is not already present
    ///
    /// Items whose enrichment fails are logged and dropped.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - Listing fails or yields no items
    /// - No item is valid after enrichment
    /// - The batch reports a failure (the first collected one)
    pub async fn download_all(&self, base_url: &str) -> Result<()> {
        let items = self.scraper.list(base_url).await?;
        if items.is_empty() {
            return Err(AppError::NoItemsListed);
        }

        let mut valid = Vec::with_capacity(items.len());
        for mut item in items {
            if let Err(e) = self.scraper.enrich(&mut item).await {
                warn!(title = %item.title, error = %e, "Enrichment failed, skipping");
                continue;
            }
            if item.is_valid() {
                valid.push(item);
            } else {
                warn!(title = %item.title, "No download link, skipping");
            }
        }

        if valid.is_empty() {
            return Err(AppError::NoValidItems);
        }

        let pending = self.missing(valid).await;
        if pending.is_empty() {
            info!("All clips are already downloaded");
            return Ok(());
        }

        info!("Downloading {} new clips", pending.len());
        self.downloader.download_batch(pending).await?;
        Ok(())
    }

    /// List clips not yet downloaded; never downloads or enriches
    ///
    /// # Errors
    ///
    /// Returns `AppError::Scrape` if listing fails
    pub async fn check_for_new(&self, base_url: &str) -> Result<Vec<Item>> {
        let items = self.scraper.list(base_url).await?;
        let new_items = self.missing(items).await;

        info!(new = new_items.len(), "Check finished");
        Ok(new_items)
    }

    /// Download the clip whose title equals `title` exactly
    ///
    /// # Errors
    ///
    /// Returns `AppError` if:
    /// - Listing fails
    /// - No listed clip has that title (`ItemNotFound`)
    /// - Enrichment fails or leaves the clip invalid (`InvalidItem`)
    /// - The download fails
    pub async fn download_specific(&self, base_url: &str, title: &str) -> Result<()> {
        let items = self.scraper.list(base_url).await?;

        let mut item = items
            .into_iter()
            .find(|item| item.title == title)
            .ok_or_else(|| AppError::ItemNotFound {
                title: title.to_string(),
            })?;

        self.scraper.enrich(&mut item).await?;
        if !item.is_valid() {
            return Err(AppError::InvalidItem { title: item.title });
        }

        if self.store.exists(item.filename()).await {
            info!(title = %item.title, "Clip already downloaded");
            return Ok(());
        }

        self.downloader.download(&item).await?;
        Ok(())
    }

    async fn missing(&self, items: Vec<Item>) -> Vec<Item> {
        let mut missing = Vec::with_capacity(items.len());
        for item in items {
            if !self.store.exists(item.filename()).await {
                missing.push(item);
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::traits::ProgressCallback;
    use crate::errors::{
        DownloadError, DownloadResult, ResolverError, ScrapeError, ScrapeResult, StorageResult,
    };
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct FakeScraper {
        titles: Vec<&'static str>,
        links: Vec<(&'static str, &'static str)>,
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl ItemScraper for FakeScraper {
        async fn list(&self, _base_url: &str) -> ScrapeResult<Vec<Item>> {
            Ok(self
                .titles
                .iter()
                .map(|t| Item::new(*t, *t, format!("https://site/{}", t), None))
                .collect())
        }

        async fn enrich(&self, item: &mut Item) -> ScrapeResult<()> {
            if self.failing.contains(&item.title.as_str()) {
                return Err(ScrapeError::Resolver(ResolverError::ServerError { status: 500 }));
            }
            if let Some((_, url)) = self.links.iter().find(|(t, _)| *t == item.title) {
                item.download_url = url.to_string();
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        present: HashSet<String>,
    }

    #[async_trait]
    impl ItemStore for FakeStore {
        async fn exists(&self, filename: &str) -> bool {
            self.present.contains(filename)
        }

        fn output_directory(&self) -> &Path {
            Path::new("/fake")
        }

        async fn ensure_directory(&self, item: &Item) -> StorageResult<PathBuf> {
            Ok(PathBuf::from("/fake").join(item.bucket()))
        }

        fn file_path(&self, item: &Item) -> PathBuf {
            PathBuf::from("/fake").join(item.bucket()).join(item.filename())
        }
    }

    #[derive(Default)]
    struct RecordingDownloader {
        single: Mutex<Vec<String>>,
        batches: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl Downloader for RecordingDownloader {
        async fn download(&self, item: &Item) -> DownloadResult<()> {
            self.single.lock().unwrap().push(item.title.clone());
            Ok(())
        }

        async fn download_batch(&self, items: Vec<Item>) -> DownloadResult<()> {
            let titles = items.into_iter().map(|i| i.title).collect();
            self.batches.lock().unwrap().push(titles);
            Ok(())
        }

        fn set_progress_callback(&self, _callback: ProgressCallback) {}
    }

    struct FailingDownloader;

    #[async_trait]
    impl Downloader for FailingDownloader {
        async fn download(&self, _item: &Item) -> DownloadResult<()> {
            Err(DownloadError::ServerError { status: 500 })
        }

        async fn download_batch(&self, _items: Vec<Item>) -> DownloadResult<()> {
            Err(DownloadError::ServerError { status: 503 })
        }

        fn set_progress_callback(&self, _callback: ProgressCallback) {}
    }

    fn scraper(titles: Vec<&'static str>, links: Vec<(&'static str, &'static str)>) -> FakeScraper {
        FakeScraper {
            titles,
            links,
            failing: Vec::new(),
        }
    }

    fn service(
        scraper: FakeScraper,
        store: FakeStore,
        downloader: Arc<RecordingDownloader>,
    ) -> DownloadService {
        DownloadService::new(Arc::new(scraper), Arc::new(store), downloader)
    }

    #[tokio::test]
    async fn test_download_all_batches_valid_missing_items() {
        let downloader = Arc::new(RecordingDownloader::default());
        let mut scraper = scraper(
            vec!["Canção A 2023", "Canção B", "Canção C", "Canção D"],
            vec![
                ("Canção A 2023", "https://cdn/a.mp3"),
                ("Canção C", "https://cdn/c.mp3"),
                ("Canção D", "https://cdn/d.mp3"),
            ],
        );
        scraper.failing.push("Canção D");
        let store = FakeStore {
            present: HashSet::from(["Cancao_C.mp3".to_string()]),
        };

        service(scraper, store, downloader.clone())
            .download_all("https://site")
            .await
            .unwrap();

        let batches = downloader.batches.lock().unwrap();
        assert_eq!(batches.as_slice(), &[vec!["Canção A 2023".to_string()]]);
    }

    #[tokio::test]
    async fn test_download_all_empty_listing_is_error() {
        let downloader = Arc::new(RecordingDownloader::default());
        let result = service(scraper(vec![], vec![]), FakeStore::default(), downloader)
            .download_all("https://site")
            .await;

        assert!(matches!(result, Err(AppError::NoItemsListed)));
    }

    #[tokio::test]
    async fn test_download_all_without_valid_items_is_error() {
        let downloader = Arc::new(RecordingDownloader::default());
        let result = service(
            scraper(vec!["Canção B"], vec![]),
            FakeStore::default(),
            downloader.clone(),
        )
        .download_all("https://site")
        .await;

        assert!(matches!(result, Err(AppError::NoValidItems)));
        assert!(downloader.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_all_everything_present_is_noop() {
        let downloader = Arc::new(RecordingDownloader::default());
        let store = FakeStore {
            present: HashSet::from(["Cancao_A.mp3".to_string()]),
        };

        service(
            scraper(vec!["Canção A"], vec![("Canção A", "https://cdn/a.mp3")]),
            store,
            downloader.clone(),
        )
        .download_all("https://site")
        .await
        .unwrap();

        assert!(downloader.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_all_surfaces_batch_failure() {
        let service = DownloadService::new(
            Arc::new(scraper(vec!["Canção A"], vec![("Canção A", "https://cdn/a.mp3")])),
            Arc::new(FakeStore::default()),
            Arc::new(FailingDownloader),
        );

        let result = service.download_all("https://site").await;
        assert!(matches!(
            result,
            Err(AppError::Download(DownloadError::ServerError { status: 503 }))
        ));
    }

    #[tokio::test]
    async fn test_check_for_new_filters_existing_without_enrichment() {
        let downloader = Arc::new(RecordingDownloader::default());
        let mut scraper = scraper(vec!["Canção A", "Canção B"], vec![]);
        // Enrichment would fail for every item; check must not call it
        scraper.failing = vec!["Canção A", "Canção B"];
        let store = FakeStore {
            present: HashSet::from(["Cancao_A.mp3".to_string()]),
        };

        let new_items = service(scraper, store, downloader.clone())
            .check_for_new("https://site")
            .await
            .unwrap();

        assert_eq!(new_items.len(), 1);
        assert_eq!(new_items[0].title, "Canção B");
        assert!(new_items[0].download_url.is_empty());
        assert!(downloader.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_specific_matches_title_exactly() {
        let downloader = Arc::new(RecordingDownloader::default());
        let svc = service(
            scraper(vec!["Canção A"], vec![("Canção A", "https://cdn/a.mp3")]),
            FakeStore::default(),
            downloader.clone(),
        );

        let result = svc.download_specific("https://site", "canção a").await;
        assert!(matches!(result, Err(AppError::ItemNotFound { .. })));

        svc.download_specific("https://site", "Canção A").await.unwrap();
        assert_eq!(downloader.single.lock().unwrap().as_slice(), &["Canção A".to_string()]);
    }

    #[tokio::test]
    async fn test_download_specific_invalid_item() {
        let downloader = Arc::new(RecordingDownloader::default());
        let result = service(
            scraper(vec!["Canção B"], vec![]),
            FakeStore::default(),
            downloader.clone(),
        )
        .download_specific("https://site", "Canção B")
        .await;

        assert!(matches!(result, Err(AppError::InvalidItem { .. })));
        assert!(downloader.single.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_download_specific_existing_is_noop() {
        let downloader = Arc::new(RecordingDownloader::default());
        let store = FakeStore {
            present: HashSet::from(["Cancao_A.mp3".to_string()]),
        };

        service(
            scraper(vec!["Canção A"], vec![("Canção A", "https://cdn/a.mp3")]),
            store,
            downloader.clone(),
        )
        .download_specific("https://site", "Canção A")
        .await
        .unwrap();

        assert!(downloader.single.lock().unwrap().is_empty());
    }
}
