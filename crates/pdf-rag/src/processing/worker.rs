//! Bounded parallel processing of many documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::ingestion::DocumentProcessor;
use crate::types::{document_name, DocumentChunk};

/// Final state of one input path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum DocumentStatus {
    /// Processor returned (possibly partial or empty) chunks
    Completed,
    /// Processing failed and the document contributed nothing
    Failed(String),
}

/// Per-document entry in a batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub document_name: String,
    pub chunk_count: usize,
    pub elapsed_ms: u64,
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed(_))
    }
}

/// Result of processing one batch of paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// All chunks, grouped per document in completion order
    pub chunks: Vec<DocumentChunk>,
    /// One entry per input path, in completion order
    pub documents: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Number of documents that failed outright
    pub fn failed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_failed()).count()
    }

    /// Chunks contributed by one document, in page order
    pub fn chunks_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocumentChunk> + 'a {
        self.chunks.iter().filter(move |c| c.source_document_name == name)
    }
}

/// Runs the document processor over many paths with a fixed number of slots
#[derive(Clone)]
pub struct ProcessingWorker {
    processor: DocumentProcessor,
    max_workers: usize,
}

impl ProcessingWorker {
    /// Create a worker from configuration
    pub fn new(config: &PipelineConfig, processor: DocumentProcessor) -> Result<Self> {
        config.validate()?;
        let max_workers = config.processing.max_workers;

        tracing::info!("Worker configured: {} parallel documents", max_workers);

        Ok(Self {
            processor,
            max_workers,
        })
    }

    /// Maximum number of documents processed at the same time
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Process all paths and return the concatenated chunks
    pub async fn process_all(&self, paths: Vec<PathBuf>) -> Vec<DocumentChunk> {
        self.run(paths).await.chunks
    }

    /// Process all paths, isolating per-document failures.
    ///
    /// Each document's chunks are appended only after its task finished, so
    /// the relative order within a document is preserved while the order
    /// across documents follows completion.
    ///
    /// A panic while processing a document is reported as a failed document.
    /// This relies on panics unwinding, so the crate must not be built with
    /// `panic = "abort"`.
    pub async fn run(&self, paths: Vec<PathBuf>) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let total = paths.len();

        tracing::info!("Batch {}: processing {} documents", batch_id, total);

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut pending: HashMap<task::Id, PathBuf> = HashMap::with_capacity(total);

        for path in paths {
            let processor = self.processor.clone();
            let sem = semaphore.clone();
            let task_path = path.clone();

            let handle = tasks.spawn(async move {
                match sem.acquire_owned().await {
                    Ok(permit) => {
                        let start_time = Instant::now();
                        let result = task::spawn_blocking(move || {
                            let _permit = permit;
                            processor.process(&task_path)
                        })
                        .await
                        .unwrap_or_else(|e| Err(Error::internal(format!("Task join error: {}", e))));
                        (start_time.elapsed(), result)
                    }
                    Err(e) => (
                        Duration::ZERO,
                        Err(Error::internal(format!("Worker pool closed: {}", e))),
                    ),
                }
            });
            pending.insert(handle.id(), path);
        }

        let mut chunks = Vec::new();
        let mut documents = Vec::with_capacity(total);

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, elapsed, result) = match joined {
                Ok((id, (elapsed, result))) => (id, elapsed, result),
                Err(e) => (
                    e.id(),
                    Duration::ZERO,
                    Err(Error::internal(format!("Task join error: {}", e))),
                ),
            };

            let Some(path) = pending.remove(&id) else {
                tracing::warn!("Batch {}: finished task {} has no path", batch_id, id);
                continue;
            };

            let name = document_name(&path);
            let elapsed_ms = elapsed.as_millis() as u64;

            let outcome = match result {
                Ok(doc_chunks) => {
                    tracing::info!("Processed {}: {} chunks", path.display(), doc_chunks.len());
                    let chunk_count = doc_chunks.len();
                    chunks.extend(doc_chunks);
                    DocumentOutcome {
                        path,
                        document_name: name,
                        chunk_count,
                        elapsed_ms,
                        status: DocumentStatus::Completed,
                    }
                }
                Err(e) => {
                    tracing::error!("Error with {}: {}", path.display(), e);
                    DocumentOutcome {
                        path,
                        document_name: name,
                        chunk_count: 0,
                        elapsed_ms,
                        status: DocumentStatus::Failed(e.to_string()),
                    }
                }
            };
            documents.push(outcome);
        }

        let report = BatchReport {
            batch_id,
            started_at,
            chunks,
            documents,
        };

        tracing::info!(
            "Batch {} complete: {} chunks from {} documents ({} failed)",
            batch_id,
            report.chunks.len(),
            total,
            report.failed_count()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::extractor::fixtures::{Script, ScriptedExtractor};
    use crate::ingestion::{PageExtractor, PageSource};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        path
    }

    fn worker_with(extractor: Arc<dyn PageExtractor>, max_workers: usize) -> ProcessingWorker {
        let mut config = PipelineConfig::default();
        config.processing.max_workers = max_workers;
        let processor = DocumentProcessor::with_extractor(&config, extractor).unwrap();
        ProcessingWorker::new(&config, processor).unwrap()
    }

    fn scripted() -> ScriptedExtractor {
        ScriptedExtractor::new()
            .with_pages("a.pdf", &["First.\n\nSecond.", "Third."])
            .with_pages("c.pdf", &["RESULTS\n\nOnly one."])
            .with_script("bad.pdf", Script::Pages(vec![Err("unreadable".to_string())]))
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = PipelineConfig::default();
        let processor = DocumentProcessor::with_extractor(&config, Arc::new(scripted())).unwrap();
        config.processing.max_workers = 0;
        assert!(matches!(ProcessingWorker::new(&config, processor), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_path_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.pdf");
        let missing = dir.path().join("b.pdf");
        let c = touch(dir.path(), "c.pdf");

        let worker = worker_with(Arc::new(scripted()), 2);
        let expected_a = worker.processor.process(&a).unwrap().len();
        let expected_c = worker.processor.process(&c).unwrap().len();

        let report = worker.run(vec![a, missing.clone(), c]).await;

        assert_eq!(report.chunks.len(), expected_a + expected_c);
        assert_eq!(report.chunks.len(), 4);
        assert!(report.chunks.iter().all(|c| c.source_document_name != "b.pdf"));
        assert_eq!(report.documents.len(), 3);
        assert_eq!(report.failed_count(), 1);

        let failed = report.documents.iter().find(|d| d.is_failed()).unwrap();
        assert_eq!(failed.path, missing);
        assert_eq!(failed.chunk_count, 0);
    }

    #[tokio::test]
    async fn test_failing_document_does_not_affect_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            touch(dir.path(), "bad.pdf"),
            touch(dir.path(), "a.pdf"),
            touch(dir.path(), "c.pdf"),
        ];

        let report = worker_with(Arc::new(scripted()), 3).run(paths).await;

        assert_eq!(report.failed_count(), 0);
        assert_eq!(report.chunks_for("bad.pdf").count(), 0);
        assert_eq!(report.chunks_for("a.pdf").count(), 3);
        assert_eq!(report.chunks_for("c.pdf").count(), 1);
    }

    #[tokio::test]
    async fn test_order_within_document_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![touch(dir.path(), "a.pdf"), touch(dir.path(), "c.pdf")];

        let report = worker_with(Arc::new(scripted()), 2).run(paths).await;

        let a: Vec<(u32, usize)> = report
            .chunks_for("a.pdf")
            .map(|c| (c.page_number, c.position()))
            .collect();
        assert_eq!(a, vec![(1, 0), (1, 1), (2, 0)]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = worker_with(Arc::new(scripted()), 4).run(Vec::new()).await;
        assert!(report.chunks.is_empty());
        assert!(report.documents.is_empty());
    }

    /// Extractor that records how many documents are open at once
    struct SlowExtractor {
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    struct SlowPages {
        active: Arc<AtomicUsize>,
    }

    impl PageExtractor for SlowExtractor {
        fn open(&self, _path: &Path) -> crate::error::Result<Box<dyn PageSource>> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            Ok(Box::new(SlowPages { active: self.active.clone() }))
        }
    }

    impl PageSource for SlowPages {
        fn page_count(&self) -> u32 {
            1
        }

        fn page_text(&mut self, _page_number: u32) -> crate::error::Result<String> {
            std::thread::sleep(Duration::from_millis(30));
            Ok("Body text.".to_string())
        }
    }

    impl Drop for SlowPages {
        fn drop(&mut self) {
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..8)
            .map(|i| touch(dir.path(), &format!("doc{}.pdf", i)))
            .collect();

        let peak = Arc::new(AtomicUsize::new(0));
        let extractor = SlowExtractor {
            active: Arc::new(AtomicUsize::new(0)),
            peak: peak.clone(),
        };

        let chunks = worker_with(Arc::new(extractor), 2).process_all(paths).await;

        assert_eq!(chunks.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_elapsed_excludes_queue_wait() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| touch(dir.path(), &format!("doc{}.pdf", i)))
            .collect();

        let extractor = SlowExtractor {
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        };

        // One slot: the last document waits for three 30ms documents first
        let report = worker_with(Arc::new(extractor), 1).run(paths).await;

        assert_eq!(report.documents.len(), 4);
        assert!(report.documents.iter().all(|d| d.elapsed_ms < 85));
    }

    /// Panics while opening one chosen document, delegates everything else
    struct PanickingExtractor {
        target: &'static str,
        inner: ScriptedExtractor,
    }

    impl PageExtractor for PanickingExtractor {
        fn open(&self, path: &Path) -> crate::error::Result<Box<dyn PageSource>> {
            if document_name(path) == self.target {
                panic!("malformed content stream in {}", self.target);
            }
            self.inner.open(path)
        }
    }

    #[tokio::test]
    async fn test_panicking_document_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let boom = touch(dir.path(), "boom.pdf");
        let paths = vec![touch(dir.path(), "a.pdf"), boom.clone(), touch(dir.path(), "c.pdf")];
        let extractor = PanickingExtractor {
            target: "boom.pdf",
            inner: scripted(),
        };

        let report = worker_with(Arc::new(extractor), 2).run(paths.clone()).await;

        assert_eq!(report.documents.len(), paths.len());
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.chunks_for("a.pdf").count(), 3);
        assert_eq!(report.chunks_for("c.pdf").count(), 1);
        assert_eq!(report.chunks_for("boom.pdf").count(), 0);

        let failed = report.documents.iter().find(|d| d.is_failed()).unwrap();
        assert_eq!(failed.path, boom);
        assert_eq!(failed.chunk_count, 0);
        assert!(matches!(&failed.status, DocumentStatus::Failed(reason) if reason.contains("join error")));
    }
}
