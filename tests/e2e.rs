//! End-to-end integration tests for aeroscribe.
//!
//! The pipeline tests run fully offline against a scripted backend injected
//! through `BatchConfig::builder().backend(..)`. The final test makes a live
//! call to a local Ollama daemon and is gated behind the `E2E_ENABLED`
//! environment variable so it does not run in CI unless explicitly requested.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture
//!
//! Live test:
//!   E2E_ENABLED=1 cargo test --test e2e live_ -- --nocapture

use aeroscribe::{
    describe_folder, describe_to_file, BackendError, BatchConfig, DescriptionBackend,
    ExportFormat, ERROR_PREFIX,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Backend scripted per file name: `a.jpg` gets a fixed description, any
/// file whose name starts with `b` fails with a transport-style error.
struct ScriptedBackend;

#[async_trait]
impl DescriptionBackend for ScriptedBackend {
    async fn describe(&self, image_path: &Path, _prompt: &str) -> Result<String, BackendError> {
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.starts_with('b') {
            Err(BackendError::Api {
                status: 503,
                body: "daemon unavailable".to_string(),
            })
        } else {
            Ok("A plane wing over clouds.".to_string())
        }
    }
}

fn scripted_config() -> BatchConfig {
    BatchConfig::builder()
        .backend(Arc::new(ScriptedBackend))
        .build()
        .expect("config")
}

fn image_folder(names: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in names {
        std::fs::write(dir.path().join(name), b"not a real image").expect("write");
    }
    dir
}

// ── Offline pipeline tests ───────────────────────────────────────────────────

#[tokio::test]
async fn mixed_batch_describes_everything_and_keeps_going() {
    let dir = image_folder(&["a.jpg", "b.jpg"]);
    let config = scripted_config();

    let output = describe_folder(dir.path(), &config).await.expect("batch");

    assert_eq!(output.records.len(), 2);
    assert!(
        output.records.iter().all(|r| r.description.is_some()),
        "every record must end the run with a description"
    );
    assert_eq!(output.stats.described, 1);
    assert_eq!(output.stats.failed, 1);

    let by_name = |name: &str| {
        output
            .records
            .iter()
            .find(|r| r.file_name() == name)
            .expect("record")
    };
    assert_eq!(by_name("a.jpg").description_text(), "A plane wing over clouds.");
    let failed = by_name("b.jpg").description_text();
    assert!(failed.starts_with(ERROR_PREFIX), "got: {failed}");
    assert!(failed.contains("daemon unavailable"));
}

#[tokio::test]
async fn csv_export_has_header_and_one_row_per_image() {
    let dir = image_folder(&["a.jpg", "b.jpg"]);
    let config = scripted_config();
    let out = dir.path().join("descriptions.csv");

    describe_to_file(dir.path(), ExportFormat::Csv, &out, &config)
        .await
        .expect("batch");

    let mut reader = csv::Reader::from_path(&out).expect("open csv");
    assert_eq!(
        reader.headers().expect("headers"),
        &csv::StringRecord::from(vec!["Image File", "Description"])
    );
    let rows: Vec<csv::StringRecord> =
        reader.records().collect::<Result<_, _>>().expect("rows");
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn all_four_formats_produce_a_file() {
    let dir = image_folder(&["a.jpg"]);
    let config = scripted_config();

    for (format, name) in [
        (ExportFormat::Spreadsheet, "out.xlsx"),
        (ExportFormat::Csv, "out.csv"),
        (ExportFormat::PlainText, "out.txt"),
        (ExportFormat::Pdf, "out.pdf"),
    ] {
        let out = dir.path().join(name);
        describe_to_file(dir.path(), format, &out, &config)
            .await
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        let len = std::fs::metadata(&out).expect("metadata").len();
        assert!(len > 0, "{name} is empty");
    }
}

#[tokio::test]
async fn plain_text_export_matches_block_layout() {
    let dir = image_folder(&["a.jpg"]);
    let config = scripted_config();
    let out = dir.path().join("descriptions.txt");

    describe_to_file(dir.path(), ExportFormat::PlainText, &out, &config)
        .await
        .expect("batch");

    let text = std::fs::read_to_string(&out).expect("read");
    assert_eq!(
        text,
        "Image File: a.jpg\nDescription:\nA plane wing over clouds.\n\n"
    );
}

#[tokio::test]
async fn raster_files_are_converted_before_the_backend_sees_them() {
    use tiff::encoder::{colortype, TiffEncoder};

    let dir = image_folder(&[]);
    let tif = dir.path().join("scene.tif");
    let mut file = std::fs::File::create(&tif).expect("create");
    TiffEncoder::new(&mut file)
        .expect("encoder")
        .write_image::<colortype::RGB8>(2, 1, &[10, 20, 30, 40, 50, 60])
        .expect("write tiff");
    drop(file);

    let config = scripted_config();
    let output = describe_folder(dir.path(), &config).await.expect("batch");

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].file_name(), "scene.png");
    assert!(dir.path().join("scene.png").exists());
}

// ── Live Ollama test (opt-in) ────────────────────────────────────────────────

/// Skip unless E2E_ENABLED is set and an Ollama daemon answers locally.
macro_rules! e2e_skip_unless_ready {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run live e2e tests");
            return;
        }
        if !ollama_is_available().await {
            println!("SKIP: no Ollama daemon at localhost:11434");
            return;
        }
    }};
}

async fn ollama_is_available() -> bool {
    reqwest::Client::new()
        .get("http://localhost:11434/api/tags")
        .timeout(std::time::Duration::from_secs(2))
        .send()
        .await
        .map(|r| r.status().is_success())
        .unwrap_or(false)
}

fn live_test_folder() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

#[tokio::test]
async fn live_batch_against_local_daemon() {
    e2e_skip_unless_ready!();

    let folder = live_test_folder();
    if !folder.exists() {
        println!("SKIP: test folder not found: {}", folder.display());
        return;
    }

    let config = BatchConfig::builder()
        .api_timeout_secs(600)
        .build()
        .expect("config");

    let output = describe_folder(&folder, &config).await.expect("batch");
    for record in &output.records {
        println!("{}: {}", record.file_name(), record.description_text());
        assert!(record.description.is_some());
    }
}
