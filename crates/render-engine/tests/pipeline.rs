use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use vibe_common::config::AppConfig;
use vibe_common::error::VibeError;
use vibe_project_model::category::{AudioVibe, Category};
use vibe_project_model::project::{Project, ProjectStatus, Upload};
use vibe_project_model::store::{InMemoryProjectStore, ProjectStore};
use vibe_render_engine::{
    AudioOutcome, CommandRunner, GenerationRequest, GenerationService, RenderPipeline, RunError,
};

type FailRule = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

/// Pretends to be ffmpeg: records every call and writes the output file
/// (the last argument) unless a rule says the call fails.
struct ScriptedRunner {
    available: bool,
    fail: FailRule,
    calls: Mutex<Vec<Vec<String>>>,
    timeouts: Mutex<Vec<(String, Duration)>>,
    concat_lists: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    fn ok() -> Arc<Self> {
        Self::failing(|_| false)
    }

    fn failing(rule: impl Fn(&[String]) -> bool + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            available: true,
            fail: Box::new(rule),
            calls: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
            concat_lists: Mutex::new(Vec::new()),
        })
    }

    fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            fail: Box::new(|_| true),
            calls: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
            concat_lists: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_writing(&self, name_prefix: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|args| output_name(args).starts_with(name_prefix))
            .collect()
    }

    /// Timeout handed to each call whose output starts with `name_prefix`.
    fn timeouts_writing(&self, name_prefix: &str) -> Vec<Duration> {
        self.timeouts
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name.starts_with(name_prefix))
            .map(|(_, timeout)| *timeout)
            .collect()
    }

    fn concat_lists(&self) -> Vec<String> {
        self.concat_lists.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Result<(), RunError> {
        self.calls.lock().unwrap().push(args.to_vec());
        self.timeouts
            .lock()
            .unwrap()
            .push((output_name(args), timeout));

        if let Some(list) = value_after(args, "-f")
            .filter(|f| *f == "concat")
            .and_then(|_| value_after(args, "-i"))
        {
            let contents = std::fs::read_to_string(list).unwrap_or_default();
            self.concat_lists.lock().unwrap().push(contents);
        }

        let output = PathBuf::from(args.last().unwrap());
        if (self.fail)(args) {
            // Leave a partial file behind like a crashed encoder would.
            std::fs::write(&output, b"partial").ok();
            return Err(RunError::Failed {
                status: "exit status: 1".to_string(),
                stderr: "scripted failure".to_string(),
            });
        }
        std::fs::write(&output, b"media").unwrap();
        Ok(())
    }

    async fn version(&self) -> Option<String> {
        self.available
            .then(|| "ffmpeg version 6.1-scripted".to_string())
    }
}

fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn values_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].as_str())
        .collect()
}

fn output_name(args: &[String]) -> String {
    Path::new(args.last().unwrap())
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

struct Fixture {
    dir: TempDir,
    config: AppConfig,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            workspace_dir: dir.path().join("uploads"),
            output_dir: dir.path().join("outputs"),
            ..AppConfig::default()
        };
        Self { dir, config }
    }

    fn pipeline(&self, runner: Arc<ScriptedRunner>) -> RenderPipeline {
        RenderPipeline::new(runner, &self.config)
    }

    /// Real audio file the mixer will accept.
    fn audio_file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"ID3").unwrap();
        path
    }

    fn output_files(&self) -> Vec<String> {
        list_names(&self.config.output_dir)
    }

    fn workspace_files(&self, project: &Project) -> Vec<String> {
        list_names(&self.config.workspace_dir.join(&project.id))
    }
}

fn list_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn add_media(project: &mut Project, path: &str) -> String {
    match project.add_upload(path, Path::new(path).file_name().unwrap().to_string_lossy()) {
        Upload::Media(item) => item.id,
        Upload::Audio(_) => panic!("{path} classified as audio"),
    }
}

fn add_track(project: &mut Project, path: &Path) -> String {
    match project.add_upload(path, "track.mp3") {
        Upload::Audio(track) => track.id,
        Upload::Media(_) => panic!("{} classified as media", path.display()),
    }
}

#[tokio::test]
async fn three_images_split_target_and_track_mixes_at_half_volume() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Travel, AudioVibe::Chill, 30.0);
    for name in ["a.jpg", "b.png", "c.webp"] {
        add_media(&mut project, &format!("/media/{name}"));
    }
    add_track(&mut project, &fx.audio_file("song.mp3"));

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(output.status, ProjectStatus::Complete);
    assert_eq!(output.audio, AudioOutcome::Mixed);
    assert_eq!(output.segments_used, 3);
    assert_eq!(output.segments_failed, 0);

    let segments = runner.calls_writing("seg_");
    assert_eq!(segments.len(), 3);
    for args in &segments {
        assert_eq!(value_after(args, "-t"), Some("10"));
    }

    let mix = runner.calls_writing("vibe_");
    assert_eq!(mix.len(), 1);
    assert_eq!(value_after(&mix[0], "-filter_complex"), Some("[1:a]volume=0.5[aout]"));
    assert_eq!(value_after(&mix[0], "-t"), Some("30"));
    assert_eq!(values_after(&mix[0], "-map"), vec!["0:v:0", "[aout]"]);

    assert_eq!(fx.output_files(), vec![output.filename.clone()]);
    assert!(output.output_path.exists());
    assert!(fx.workspace_files(&project).is_empty());
}

#[tokio::test]
async fn custom_video_durations_are_kept_and_output_capped_at_target() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Fitness, AudioVibe::Energetic, 10.0);
    let first = add_media(&mut project, "/media/run.mp4");
    let second = add_media(&mut project, "/media/lift.mov");
    project.media_item_mut(&first).unwrap().custom_duration = Some(5.0);
    project.media_item_mut(&second).unwrap().custom_duration = Some(8.0);

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    let durations: Vec<String> = runner
        .calls_writing("seg_")
        .iter()
        .map(|args| value_after(args, "-t").unwrap().to_string())
        .collect();
    assert_eq!(durations, vec!["5", "8"]);

    // No tracks, so the clips' own audio is the only source.
    let mix = runner.calls_writing("vibe_");
    assert_eq!(value_after(&mix[0], "-t"), Some("10"));
    assert_eq!(value_after(&mix[0], "-filter_complex"), Some("[1:a]volume=1[aout]"));
    assert_eq!(output.audio, AudioOutcome::Mixed);

    let extraction = runner.calls_writing("vid_audio");
    assert_eq!(extraction.len(), 1);
    assert!(extraction[0].contains(&"-vn".to_string()));
}

#[tokio::test]
async fn every_track_plus_clip_audio_is_a_looped_input() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Celebration, AudioVibe::Energetic, 20.0);
    add_media(&mut project, "/media/party.mp4");
    add_media(&mut project, "/media/cake.jpg");
    add_track(&mut project, &fx.audio_file("one.mp3"));
    add_track(&mut project, &fx.audio_file("two.wav"));
    project.set_video_volume(40);

    fx.pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    let mix = &runner.calls_writing("vibe_")[0];
    assert_eq!(values_after(mix, "-stream_loop").len(), 3);
    let graph = value_after(mix, "-filter_complex").unwrap();
    assert!(graph.contains("[3:a]volume=0.4[a2]"));
    assert!(graph.ends_with("amix=inputs=3:duration=first:dropout_transition=0:normalize=0[aout]"));

    // Only the video segment feeds the clip-audio list.
    let lists = runner.concat_lists();
    let clip_list = lists.last().unwrap();
    assert_eq!(clip_list.lines().count(), 1);
    assert!(clip_list.contains("seg_000.mp4"));
}

#[tokio::test]
async fn failed_clip_audio_extraction_mixes_tracks_alone() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| output_name(args) == "vid_audio.aac");
    let mut project = Project::new(Category::Celebration, AudioVibe::Energetic, 20.0);
    add_media(&mut project, "/media/party.mp4");
    add_track(&mut project, &fx.audio_file("one.mp3"));
    add_track(&mut project, &fx.audio_file("two.mp3"));

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(runner.calls_writing("vid_audio").len(), 1);
    assert_eq!(output.audio, AudioOutcome::Mixed);

    let mix = &runner.calls_writing("vibe_")[0];
    assert_eq!(values_after(mix, "-stream_loop").len(), 2);
    assert_eq!(values_after(mix, "-i").len(), 3);
    assert!(!values_after(mix, "-i").iter().any(|i| i.ends_with("vid_audio.aac")));
    let graph = value_after(mix, "-filter_complex").unwrap();
    assert!(graph.contains("amix=inputs=2:"));
    assert!(fx.workspace_files(&project).is_empty());
}

#[tokio::test]
async fn stage_timeouts_scale_with_target() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Travel, AudioVibe::Travel, 100.0);
    add_media(&mut project, "/media/trail.mp4");
    add_media(&mut project, "/media/peak.jpg");
    add_track(&mut project, &fx.audio_file("theme.mp3"));

    fx.pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(
        runner.timeouts_writing("seg_"),
        vec![Duration::from_secs(400); 2]
    );
    assert_eq!(runner.timeouts_writing("concat_"), vec![Duration::from_secs(300)]);
    assert_eq!(runner.timeouts_writing("vid_audio"), vec![Duration::from_secs(60)]);
    assert_eq!(runner.timeouts_writing("vibe_"), vec![Duration::from_secs(300)]);
}

#[tokio::test]
async fn short_targets_use_timeout_floors() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Food, AudioVibe::Chill, 10.0);
    add_media(&mut project, "/media/toast.jpg");
    add_track(&mut project, &fx.audio_file("jazz.mp3"));

    fx.pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(runner.timeouts_writing("seg_"), vec![Duration::from_secs(90)]);
    assert_eq!(runner.timeouts_writing("concat_"), vec![Duration::from_secs(180)]);
    assert_eq!(runner.timeouts_writing("vibe_"), vec![Duration::from_secs(180)]);
}

#[tokio::test]
async fn muted_clips_contribute_no_audio_source() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Chill, AudioVibe::Chill, 12.0);
    add_media(&mut project, "/media/waves.mp4");
    project.set_video_volume(0);

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert!(runner.calls_writing("vid_audio").is_empty());
    assert!(runner.calls_writing("vibe_").is_empty());
    assert_eq!(output.audio, AudioOutcome::Silent);
    assert!(output.output_path.exists());
    assert!(runner.calls_writing("seg_")[0].contains(&"-an".to_string()));
}

#[tokio::test]
async fn missing_track_file_is_left_out() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Food, AudioVibe::Chill, 15.0);
    add_media(&mut project, "/media/soup.jpg");
    let present = fx.audio_file("present.mp3");
    add_track(&mut project, &fx.dir.path().join("deleted.mp3"));
    add_track(&mut project, &present);

    fx.pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    let mix = &runner.calls_writing("vibe_")[0];
    let inputs = values_after(mix, "-i");
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[1], present.display().to_string());
}

#[tokio::test]
async fn failed_segments_leave_no_gap_and_keep_order() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| output_name(args) == "seg_001.mp4");
    let mut project = Project::new(Category::Corporate, AudioVibe::Corporate, 30.0);
    let ids: Vec<String> = ["x.jpg", "y.jpg", "z.jpg"]
        .iter()
        .map(|name| add_media(&mut project, &format!("/media/{name}")))
        .collect();
    // Timeline order z, x, y.
    project.reorder(&[ids[2].clone(), ids[0].clone(), ids[1].clone()]);

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(output.segments_used, 2);
    assert_eq!(output.segments_failed, 1);

    let first_inputs: Vec<String> = runner
        .calls_writing("seg_")
        .iter()
        .map(|args| value_after(args, "-i").unwrap().to_string())
        .collect();
    assert_eq!(first_inputs, vec!["/media/z.jpg", "/media/x.jpg", "/media/y.jpg"]);

    let list = &runner.concat_lists()[0];
    let entries: Vec<&str> = list.lines().collect();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].ends_with("seg_000.mp4'"));
    assert!(entries[1].ends_with("seg_002.mp4'"));
    assert!(fx.workspace_files(&project).is_empty());
}

#[tokio::test]
async fn all_segments_failing_is_no_usable_media() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| output_name(args).starts_with("seg_"));
    let mut project = Project::new(Category::Travel, AudioVibe::Travel, 10.0);
    add_media(&mut project, "/media/a.jpg");
    add_media(&mut project, "/media/b.mp4");

    let err = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::NoUsableMedia { .. }));
    assert!(runner.calls_writing("concat_").is_empty());
    assert!(fx.workspace_files(&project).is_empty());
    assert!(fx.output_files().is_empty());
}

#[tokio::test]
async fn concat_failure_is_fatal_and_leaves_no_output() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| output_name(args).starts_with("concat_"));
    let mut project = Project::new(Category::Religious, AudioVibe::Religious, 20.0);
    add_media(&mut project, "/media/a.jpg");
    add_track(&mut project, &fx.audio_file("hymn.mp3"));

    let err = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::ConcatenationFailed { .. }));
    assert!(runner.calls_writing("vibe_").is_empty());
    assert!(fx.output_files().is_empty());
    assert!(fx.workspace_files(&project).is_empty());
}

#[tokio::test]
async fn mix_failure_falls_back_to_first_source() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| args.iter().any(|a| a == "[aout]"));
    let mut project = Project::new(Category::Motivational, AudioVibe::Cinematic, 20.0);
    add_media(&mut project, "/media/a.jpg");
    let first = fx.audio_file("first.mp3");
    add_track(&mut project, &first);
    add_track(&mut project, &fx.audio_file("second.mp3"));

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(output.audio, AudioOutcome::FirstSourceOnly);
    let attempts = runner.calls_writing("vibe_");
    assert_eq!(attempts.len(), 2);
    let fallback = &attempts[1];
    assert_eq!(values_after(fallback, "-i")[1], first.display().to_string());
    assert_eq!(values_after(fallback, "-map"), vec!["0:v:0", "1:a:0"]);
    assert_eq!(value_after(fallback, "-t"), Some("20"));
    assert!(!fallback.contains(&"-filter_complex".to_string()));

    assert_eq!(fx.output_files(), vec![output.filename]);
    assert_eq!(
        runner.timeouts_writing("vibe_"),
        vec![Duration::from_secs(180), Duration::from_secs(120)]
    );
}

#[tokio::test]
async fn both_mix_tiers_failing_deliver_silent_video() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::failing(|args| output_name(args).starts_with("vibe_"));
    let mut project = Project::new(Category::Motivational, AudioVibe::Cinematic, 20.0);
    add_media(&mut project, "/media/a.jpg");
    add_track(&mut project, &fx.audio_file("first.mp3"));

    let output = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap();

    assert_eq!(output.audio, AudioOutcome::Silent);
    assert_eq!(runner.calls_writing("vibe_").len(), 2);
    // The concatenated video replaced the partial mux output.
    assert_eq!(std::fs::read(&output.output_path).unwrap(), b"media");
    assert_eq!(fx.output_files(), vec![output.filename]);
}

#[tokio::test]
async fn missing_encoder_fails_before_any_work() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::unavailable();
    let mut project = Project::new(Category::Travel, AudioVibe::Travel, 10.0);
    add_media(&mut project, "/media/a.jpg");

    let err = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::EncoderUnavailable { .. }));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn empty_project_is_rejected() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let project = Project::new(Category::Travel, AudioVibe::Travel, 10.0);

    let err = fx
        .pipeline(runner.clone())
        .generate(&project, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::NoUsableMedia { .. }));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn request_overrides_frame_and_duration() {
    let fx = Fixture::new();
    let runner = ScriptedRunner::ok();
    let mut project = Project::new(Category::Travel, AudioVibe::Travel, 30.0);
    add_media(&mut project, "/media/a.mp4");
    project.set_video_volume(0);

    let request = GenerationRequest {
        target_duration: Some(6.0),
        width: Some(720),
        height: Some(1280),
        fps: Some(24),
    };
    fx.pipeline(runner.clone())
        .generate(&project, &request)
        .await
        .unwrap();

    let segment = &runner.calls_writing("seg_")[0];
    assert_eq!(value_after(segment, "-t"), Some("6"));
    assert!(value_after(segment, "-vf")
        .unwrap()
        .starts_with("scale=720:1280:force_original_aspect_ratio=increase,crop=720:1280"));
}

#[tokio::test]
async fn invalid_frame_override_is_rejected_before_encoding() {
    let fx = Fixture::new();
    let mut project = Project::new(Category::Travel, AudioVibe::Travel, 10.0);
    add_media(&mut project, "/media/a.jpg");

    for (width, height) in [(0, 1920), (721, 1280), (720, 1279)] {
        let runner = ScriptedRunner::ok();
        let request = GenerationRequest {
            width: Some(width),
            height: Some(height),
            ..GenerationRequest::default()
        };
        let err = fx
            .pipeline(runner.clone())
            .generate(&project, &request)
            .await
            .unwrap_err();

        assert!(matches!(err, VibeError::Project { .. }), "{width}x{height}");
        assert!(runner.calls().is_empty());
    }
}

#[tokio::test]
async fn service_records_status_and_output() {
    let fx = Fixture::new();
    let store = Arc::new(InMemoryProjectStore::new());
    let mut project = Project::new(Category::Food, AudioVibe::Energetic, 8.0);
    add_media(&mut project, "/media/pie.jpg");
    let id = project.id.clone();
    store.put(project);

    let service = GenerationService::new(store.clone(), fx.pipeline(ScriptedRunner::ok()));
    let output = service
        .generate(&id, &GenerationRequest::default())
        .await
        .unwrap();

    let stored = store.get(&id).unwrap();
    assert_eq!(stored.status, ProjectStatus::Complete);
    assert_eq!(stored.output, Some(output.output_path));
    assert!(store.begin_generation(&id).is_ok());
}

#[tokio::test]
async fn service_marks_failed_projects() {
    let fx = Fixture::new();
    let store = Arc::new(InMemoryProjectStore::new());
    let mut project = Project::new(Category::Food, AudioVibe::Energetic, 8.0);
    add_media(&mut project, "/media/pie.jpg");
    let id = project.id.clone();
    store.put(project);

    let runner = ScriptedRunner::failing(|args| output_name(args).starts_with("concat_"));
    let service = GenerationService::new(store.clone(), fx.pipeline(runner));
    let err = service
        .generate(&id, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::ConcatenationFailed { .. }));
    let stored = store.get(&id).unwrap();
    assert_eq!(stored.status, ProjectStatus::Failed);
    assert!(stored.output.is_none());
    // Guard released on the error path too.
    assert!(store.begin_generation(&id).is_ok());
}

#[tokio::test]
async fn service_rejects_concurrent_generation() {
    let fx = Fixture::new();
    let store = Arc::new(InMemoryProjectStore::new());
    let mut project = Project::new(Category::Chill, AudioVibe::Chill, 8.0);
    add_media(&mut project, "/media/rain.jpg");
    let id = project.id.clone();
    store.put(project);

    let runner = ScriptedRunner::ok();
    let service = GenerationService::new(store.clone(), fx.pipeline(runner.clone()));

    let _in_flight = store.begin_generation(&id).unwrap();
    let err = service
        .generate(&id, &GenerationRequest::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::GenerationInProgress { .. }));
    assert!(runner.calls().is_empty());
    assert_eq!(store.get(&id).unwrap().status, ProjectStatus::Draft);
}

#[tokio::test]
async fn service_reports_unknown_project() {
    let fx = Fixture::new();
    let store = Arc::new(InMemoryProjectStore::new());
    let service = GenerationService::new(store, fx.pipeline(ScriptedRunner::ok()));

    let err = service
        .generate("missing", &GenerationRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VibeError::ProjectNotFound { .. }));
}
