//! Batch ingestion binary
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-ingest -- <paths>...

use clap::Parser;
use pdf_rag::providers::{ChunkRecord, InMemoryVectorStore, VectorStoreProvider};
use pdf_rag::{DocumentProcessor, PipelineConfig, ProcessingWorker};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

#[derive(Debug, Parser)]
#[command(name = "pdf-rag-ingest", version, about = "Chunk PDFs for retrieval")]
struct Args {
    /// PDF files or directories to scan (default: storage.upload_dir)
    paths: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of documents processed in parallel
    #[arg(short, long)]
    workers: Option<usize>,

    /// Print every chunk record as a JSON line
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.processing.max_workers = workers;
    }
    config.validate()?;

    let roots = if args.paths.is_empty() {
        vec![config.storage.upload_dir.clone()]
    } else {
        args.paths.clone()
    };
    let pdfs = collect_pdfs(&roots);
    tracing::info!("Found {} PDF files", pdfs.len());

    let processor = DocumentProcessor::new(&config)?;
    let worker = ProcessingWorker::new(&config, processor)?;
    let report = worker.run(pdfs).await;

    let store = InMemoryVectorStore::from_config(&config);
    let added = store.add_chunks(&report.chunks).await?;

    if args.json {
        for chunk in &report.chunks {
            let record = ChunkRecord::from_chunk(chunk, config.chunking.preview_chars);
            println!("{}", serde_json::to_string(&record)?);
        }
    }

    eprintln!("\nDocuments:");
    for doc in &report.documents {
        match &doc.status {
            pdf_rag::processing::DocumentStatus::Completed => {
                eprintln!("  {:<40} {:>6} chunks  {:>6} ms", doc.document_name, doc.chunk_count, doc.elapsed_ms)
            }
            pdf_rag::processing::DocumentStatus::Failed(reason) => {
                eprintln!("  {:<40} FAILED: {}", doc.document_name, reason)
            }
        }
    }

    let stats = store.stats().await?;
    eprintln!(
        "\n{} chunks ({} new) in collection '{}', {} failed documents",
        stats.total_documents,
        added,
        stats.collection_name,
        report.failed_count()
    );

    Ok(())
}

/// Expand directories into the PDF files below them; explicit files are kept as given
fn collect_pdfs(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut pdfs = Vec::new();
    for root in roots {
        if !root.is_dir() {
            pdfs.push(root.clone());
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_file() && is_pdf(entry.path()) {
                pdfs.push(entry.into_path());
            }
        }
    }
    pdfs
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
}
