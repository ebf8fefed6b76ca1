use std::path::{Path, PathBuf};
use std::time::Duration;

use regret_shared::{Catalog, MediaKind, MediaStrategy, SceneKind};
use tracing::{error, info, warn};

use crate::client::MediaGenerator;
use crate::error::{GeneratorError, RetryClass};

pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Attempts and delays for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    /// Multiplied by the attempt number after a provider-reported error.
    pub provider_backoff: Duration,
    /// Multiplied by the attempt number after an empty result or transport error.
    pub transient_backoff: Duration,
    /// Pause after each file's generation, whatever the outcome.
    pub rate_limit: Duration,
}

impl RetryPolicy {
    pub fn new(rate_limit: Duration) -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            provider_backoff: Duration::from_secs(15),
            transient_backoff: Duration::from_secs(10),
            rate_limit,
        }
    }

    pub fn backoff(&self, class: RetryClass, attempt: u32) -> Duration {
        let base = match class {
            RetryClass::Provider => self.provider_backoff,
            RetryClass::Transient => self.transient_backoff,
        };
        base * attempt
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.generated + self.skipped + self.failed
    }
}

/// One output file to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub scenario_id: String,
    pub scene: SceneKind,
    /// `None` when the catalog has no prompt of the requested kind.
    pub prompt: Option<String>,
    pub path: PathBuf,
}

impl Job {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Every scenario × scene, in catalog order.
pub fn plan_jobs(catalog: &Catalog, kind: MediaKind, extension: &str, output_dir: &Path) -> Vec<Job> {
    let strategy = match kind {
        MediaKind::Image => MediaStrategy::GeneratedImage,
        MediaKind::Video => MediaStrategy::GeneratedVideo,
    };

    catalog
        .iter()
        .flat_map(|record| {
            SceneKind::ALL.into_iter().map(move |scene| Job {
                scenario_id: record.id.clone(),
                scene,
                prompt: record.scene(scene).media_source(strategy).map(str::to_string),
                path: output_dir.join(format!("{}.{}", record.asset_stem(scene), extension)),
            })
        })
        .collect()
}

/// Calls the generator up to `policy.attempts` times, sleeping between tries.
pub async fn generate_with_retry<G: MediaGenerator>(
    generator: &G,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<Vec<u8>, GeneratorError> {
    let mut last_error = GeneratorError::EmptyResult;
    for attempt in 1..=policy.attempts {
        info!("    Attempt {}/{}...", attempt, policy.attempts);
        let error = match generator.generate(prompt).await {
            Ok(bytes) if !bytes.is_empty() => return Ok(bytes),
            Ok(_) => GeneratorError::EmptyResult,
            Err(e) => e,
        };
        warn!("    {}", error);

        if attempt < policy.attempts {
            let wait = policy.backoff(error.retry_class(), attempt);
            if !wait.is_zero() {
                info!("    Waiting {}s before retry...", wait.as_secs());
                tokio::time::sleep(wait).await;
            }
        }
        last_error = error;
    }
    Err(last_error)
}

/// A finished output is a non-empty file at the final path. Zero-length
/// leftovers and `.part` files do not count.
pub async fn output_exists(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

/// Sibling file the bytes are staged in before the final rename.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Writes to `<name>.part` and renames into place, so an interrupted write
/// never leaves a file under the final name.
pub async fn write_output(path: &Path, bytes: &[u8]) -> Result<(), GeneratorError> {
    let partial = partial_path(path);
    let staged = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = staged {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }
    Ok(())
}

/// Produces every missing output file. Only a failure to create the output
/// directory aborts the run; per-file failures are counted.
pub async fn run_batch<G: MediaGenerator>(
    catalog: &Catalog,
    generator: &G,
    kind: MediaKind,
    output_dir: &Path,
    policy: &RetryPolicy,
) -> Result<BatchSummary, GeneratorError> {
    tokio::fs::create_dir_all(output_dir).await?;

    let mut summary = BatchSummary::default();
    let jobs = plan_jobs(catalog, kind, generator.extension(), output_dir);
    let mut current = None;

    for job in &jobs {
        if current.as_deref() != Some(job.scenario_id.as_str()) {
            info!("📌 Scenario: {}", job.scenario_id);
            current = Some(job.scenario_id.clone());
        }
        let name = job.file_name();

        if output_exists(&job.path).await {
            info!("  ✅ {} already exists, skipping", name);
            summary.skipped += 1;
            continue;
        }

        let Some(prompt) = job.prompt.as_deref() else {
            warn!("  {} has no {:?} prompt, nothing to generate", name, kind);
            summary.failed += 1;
            continue;
        };

        info!("  🎨 Generating {}...", name);
        match generate_with_retry(generator, prompt, policy).await {
            Ok(bytes) => match write_output(&job.path, &bytes).await {
                Ok(()) => {
                    info!("  💾 Saved {} ({} KB)", name, bytes.len() / 1024);
                    summary.generated += 1;
                }
                Err(e) => {
                    error!("  Failed to write {}: {}", name, e);
                    summary.failed += 1;
                }
            },
            Err(e) => {
                error!("  Failed to generate {}: {}", name, e);
                summary.failed += 1;
            }
        }

        if !policy.rate_limit.is_zero() {
            info!("  ⏳ Waiting {}s for rate limit...", policy.rate_limit.as_secs());
            tokio::time::sleep(policy.rate_limit).await;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use uuid::Uuid;

    const CATALOG: &str = r##"[
        {"id": "alpha", "title": "Alpha", "wheelColor": "#112233", "scenes": [
            {"text": "a", "imagePrompt": "alpha opportunity", "videoPrompt": "alpha clip"},
            {"text": "b", "imagePrompt": "alpha dream"},
            {"text": "c", "imagePrompt": "alpha reality"}
        ]},
        {"id": "beta", "title": "Beta", "wheelColor": "#445566", "scenes": [
            {"text": "a", "imagePrompt": "beta opportunity"},
            {"text": "b", "imagePrompt": "beta dream"},
            {"text": "c", "imagePrompt": "beta reality"}
        ]}
    ]"##;

    /// Replays queued results, then succeeds.
    #[derive(Default)]
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<Vec<u8>, GeneratorError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn with_script(script: Vec<Result<Vec<u8>, GeneratorError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                prompts: Mutex::default(),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl MediaGenerator for ScriptedGenerator {
        fn extension(&self) -> &'static str {
            "png"
        }

        async fn generate(&self, prompt: &str) -> Result<Vec<u8>, GeneratorError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(format!("bytes for {}", prompt).into_bytes()))
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_json(CATALOG).unwrap()
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("regret-batch-{}", Uuid::new_v4()))
    }

    fn instant() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            provider_backoff: Duration::ZERO,
            transient_backoff: Duration::ZERO,
            rate_limit: Duration::ZERO,
        }
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy::new(Duration::from_secs(8));
        assert_eq!(policy.backoff(RetryClass::Provider, 1), Duration::from_secs(15));
        assert_eq!(policy.backoff(RetryClass::Provider, 2), Duration::from_secs(30));
        assert_eq!(policy.backoff(RetryClass::Transient, 2), Duration::from_secs(20));
        assert_eq!(policy.rate_limit, Duration::from_secs(8));
    }

    #[test]
    fn test_plan_names_and_prompts() {
        let dir = PathBuf::from("out");
        let jobs = plan_jobs(&catalog(), MediaKind::Image, "png", &dir);
        let names: Vec<String> = jobs.iter().map(Job::file_name).collect();
        assert_eq!(
            names,
            vec![
                "alpha-opportunity.png",
                "alpha-dream.png",
                "alpha-reality.png",
                "beta-opportunity.png",
                "beta-dream.png",
                "beta-reality.png",
            ]
        );
        assert_eq!(jobs[4].prompt.as_deref(), Some("beta dream"));

        let videos = plan_jobs(&catalog(), MediaKind::Video, "mp4", &dir);
        assert_eq!(videos[0].prompt.as_deref(), Some("alpha clip"));
        assert!(videos[1].prompt.is_none());
    }

    #[tokio::test]
    async fn test_full_run_then_idempotent_rerun() {
        let dir = temp_dir();
        let generator = ScriptedGenerator::default();

        let first = run_batch(&catalog(), &generator, MediaKind::Image, &dir, &instant()).await.unwrap();
        assert_eq!(first, BatchSummary { generated: 6, skipped: 0, failed: 0 });
        assert_eq!(generator.calls(), 6);
        let saved = std::fs::read(dir.join("beta-reality.png")).unwrap();
        assert_eq!(saved, b"bytes for beta reality");

        let second = run_batch(&catalog(), &generator, MediaKind::Image, &dir, &instant()).await.unwrap();
        assert_eq!(second, BatchSummary { generated: 0, skipped: 6, failed: 0 });
        assert_eq!(generator.calls(), 6);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_retry_recovers_on_third_attempt() {
        let generator = ScriptedGenerator::with_script(vec![
            Err(GeneratorError::Provider("quota".into())),
            Ok(Vec::new()),
        ]);
        let bytes = generate_with_retry(&generator, "p", &instant()).await.unwrap();
        assert_eq!(bytes, b"bytes for p");
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_retries_count_as_failure_and_run_continues() {
        let dir = temp_dir();
        let generator = ScriptedGenerator::with_script(vec![
            Err(GeneratorError::EmptyResult),
            Err(GeneratorError::Provider("blocked".into())),
            Err(GeneratorError::EmptyResult),
        ]);

        let summary = run_batch(&catalog(), &generator, MediaKind::Image, &dir, &instant()).await.unwrap();
        assert_eq!(summary, BatchSummary { generated: 5, skipped: 0, failed: 1 });
        assert_eq!(generator.calls(), 8);
        assert!(!dir.join("alpha-opportunity.png").exists());
        assert!(dir.join("alpha-dream.png").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_existing_files_are_skipped() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("alpha-dream.png"), b"keep me").unwrap();
        let generator = ScriptedGenerator::default();

        let summary = run_batch(&catalog(), &generator, MediaKind::Image, &dir, &instant()).await.unwrap();
        assert_eq!(summary, BatchSummary { generated: 5, skipped: 1, failed: 0 });
        assert!(!generator.prompts.lock().unwrap().iter().any(|p| p == "alpha dream"));
        assert_eq!(std::fs::read(dir.join("alpha-dream.png")).unwrap(), b"keep me");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_partial_path_keeps_extension() {
        assert_eq!(
            partial_path(Path::new("out/alpha-dream.png")),
            PathBuf::from("out/alpha-dream.png.part")
        );
    }

    #[tokio::test]
    async fn test_empty_and_partial_leftovers_are_regenerated() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("alpha-opportunity.png"), b"").unwrap();
        std::fs::write(dir.join("alpha-dream.png.part"), b"half").unwrap();
        let generator = ScriptedGenerator::default();

        let summary = run_batch(&catalog(), &generator, MediaKind::Image, &dir, &instant()).await.unwrap();
        assert_eq!(summary, BatchSummary { generated: 6, skipped: 0, failed: 0 });
        assert_eq!(std::fs::read(dir.join("alpha-opportunity.png")).unwrap(), b"bytes for alpha opportunity");
        assert_eq!(std::fs::read(dir.join("alpha-dream.png")).unwrap(), b"bytes for alpha dream");
        assert!(!dir.join("alpha-dream.png.part").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_write_output_leaves_no_partial_on_failure() {
        let dir = temp_dir();
        let target = dir.join("missing-subdir").join("alpha-dream.png");

        assert!(write_output(&target, b"data").await.is_err());
        assert!(!target.exists());
        assert!(!partial_path(&target).exists());
        assert!(!output_exists(&target).await);
    }

    #[tokio::test]
    async fn test_missing_prompts_are_failures_without_requests() {
        let dir = temp_dir();
        let generator = ScriptedGenerator::default();

        let summary = run_batch(&catalog(), &generator, MediaKind::Video, &dir, &instant()).await.unwrap();
        assert_eq!(summary, BatchSummary { generated: 1, skipped: 0, failed: 5 });
        assert_eq!(generator.calls(), 1);
        assert_eq!(summary.total(), 6);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
