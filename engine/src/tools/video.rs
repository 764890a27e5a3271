//! Video generation with the Veo 3.1 family.

use std::io::Write;

use log::info;
use strum::{Display, EnumIter};

use crate::{
    api::{NO_WEBHOOK, VIDEO_PATH, draw::VideoGenerationBody},
    attachment::ImageAttachment,
    cli::VideoArgs,
    client::GrsaiClient,
    clock::Clock,
    config::{Config, Env},
    error::{InputError, Result},
    tools::{AspectRatio, MediaOutcome, preview, render, validate_prompt},
    transport::Transport,
};

#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, PartialEq, Eq, EnumIter, Default)]
pub enum VideoModel {
    #[default]
    #[value(name = "veo3.1-fast")]
    #[strum(to_string = "veo3.1-fast")]
    Fast,
    #[value(name = "veo3.1-fast-1080p")]
    #[strum(to_string = "veo3.1-fast-1080p")]
    Fast1080p,
    #[value(name = "veo3.1-fast-4k")]
    #[strum(to_string = "veo3.1-fast-4k")]
    Fast4k,
    #[value(name = "veo3.1-pro")]
    #[strum(to_string = "veo3.1-pro")]
    Pro,
    #[value(name = "veo3.1-pro-1080p")]
    #[strum(to_string = "veo3.1-pro-1080p")]
    Pro1080p,
    #[value(name = "veo3.1-pro-4k")]
    #[strum(to_string = "veo3.1-pro-4k")]
    Pro4k,
}

#[derive(Debug, Clone, Copy, Display, PartialEq, Eq)]
pub enum Tier {
    #[strum(to_string = "fast")]
    Fast,
    #[strum(to_string = "pro")]
    Pro,
}

impl VideoModel {
    pub fn api_name(&self) -> &'static str {
        match self {
            VideoModel::Fast => "veo3.1-fast",
            VideoModel::Fast1080p => "veo3.1-fast-1080p",
            VideoModel::Fast4k => "veo3.1-fast-4k",
            VideoModel::Pro => "veo3.1-pro",
            VideoModel::Pro1080p => "veo3.1-pro-1080p",
            VideoModel::Pro4k => "veo3.1-pro-4k",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            VideoModel::Fast | VideoModel::Fast1080p | VideoModel::Fast4k => Tier::Fast,
            VideoModel::Pro | VideoModel::Pro1080p | VideoModel::Pro4k => Tier::Pro,
        }
    }

    pub fn resolution(&self) -> &'static str {
        match self {
            VideoModel::Fast | VideoModel::Pro => "720p",
            VideoModel::Fast1080p | VideoModel::Pro1080p => "1080p",
            VideoModel::Fast4k | VideoModel::Pro4k => "4k",
        }
    }
}

#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, PartialEq, Eq, EnumIter, Default)]
pub enum VideoDuration {
    #[value(name = "4")]
    #[strum(to_string = "4")]
    Four,
    #[value(name = "6")]
    #[strum(to_string = "6")]
    Six,
    #[default]
    #[value(name = "8")]
    #[strum(to_string = "8")]
    Eight,
}

impl VideoDuration {
    pub fn seconds(&self) -> u8 {
        match self {
            VideoDuration::Four => 4,
            VideoDuration::Six => 6,
            VideoDuration::Eight => 8,
        }
    }
}

#[derive(Debug)]
pub struct VideoJob {
    pub prompt: String,
    pub model: VideoModel,
    pub duration: VideoDuration,
    pub aspect_ratio: AspectRatio,
    pub first_frame: Option<ImageAttachment>,
}

impl VideoJob {
    pub fn from_args(args: &VideoArgs) -> Result<Self, InputError> {
        Ok(Self {
            prompt: validate_prompt(&args.prompt)?,
            model: args.model,
            duration: args.duration,
            aspect_ratio: args.aspect_ratio,
            first_frame: args
                .image
                .as_deref()
                .map(ImageAttachment::load)
                .transpose()?,
        })
    }

    pub fn body(&self) -> VideoGenerationBody {
        VideoGenerationBody {
            model: self.model.api_name(),
            prompt: self.prompt.clone(),
            duration_seconds: self.duration.seconds(),
            aspect_ratio: self.aspect_ratio.api_value(),
            first_frame_url: self.first_frame.as_ref().map(ImageAttachment::data_uri),
            web_hook: NO_WEBHOOK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoOutcome {
    pub media: MediaOutcome,
    pub resolution: &'static str,
    pub duration_seconds: u8,
}

pub async fn run(
    args: VideoArgs,
    env: &Env,
    transport: impl Transport,
    clock: impl Clock,
    out: &mut impl Write,
) -> Result<VideoOutcome> {
    let config = Config::resolve(args.api_key.as_deref(), env)?;
    let job = VideoJob::from_args(&args)?;

    info!(
        "Generating video: model={} ({} tier, {}), duration={}s, aspect={}",
        job.model,
        job.model.tier(),
        job.model.resolution(),
        job.duration,
        job.aspect_ratio
    );
    info!("Prompt: {}", preview(&job.prompt));

    let client = GrsaiClient::new(config, transport, clock);
    let media = render(
        &client,
        VIDEO_PATH,
        &job.body(),
        "Video",
        &args.filename,
        out,
    )
    .await?;

    Ok(VideoOutcome {
        media,
        resolution: job.model.resolution(),
        duration_seconds: job.duration.seconds(),
    })
}

#[cfg(test)]
mod test {
    use std::{fs, io, sync::Arc};

    use clap::Parser;
    use serde_json::json;
    use strum::IntoEnumIterator;
    use tempfile::tempdir;

    use super::*;
    use crate::{
        error::SkillError,
        testing::{FakeTransport, ManualClock},
    };

    fn args(extra: &[&str]) -> VideoArgs {
        VideoArgs::try_parse_from(["generate_video"].into_iter().chain(extra.iter().copied()))
            .unwrap()
    }

    fn env_with_key() -> Env {
        Env {
            api_key: Some("k".into()),
            base_url: None,
        }
    }

    #[test]
    fn defaults() {
        let args = args(&["-p", "waves", "-f", "out.mp4"]);
        assert_eq!(args.model, VideoModel::Fast);
        assert_eq!(args.duration, VideoDuration::Eight);
        assert_eq!(args.aspect_ratio, AspectRatio::Landscape);
    }

    #[test]
    fn option_lookup_tables() {
        let args = args(&[
            "-p",
            "waves",
            "-f",
            "out.mp4",
            "-m",
            "veo3.1-pro-1080p",
            "-d",
            "4",
            "-a",
            "9:16",
        ]);
        let job = VideoJob::from_args(&args).unwrap();
        let body = serde_json::to_value(job.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "veo3.1-pro-1080p",
                "prompt": "waves",
                "durationSeconds": 4,
                "aspectRatio": "9:16",
                "webHook": "-1",
            })
        );
        assert_eq!(job.model.tier(), Tier::Pro);
        assert_eq!(job.model.resolution(), "1080p");
    }

    #[test]
    fn display_matches_api_name() {
        for model in VideoModel::iter() {
            assert_eq!(model.to_string(), model.api_name());
        }
        for duration in VideoDuration::iter() {
            assert_eq!(duration.to_string(), duration.seconds().to_string());
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        let base = ["generate_video", "-p", "x", "-f", "o.mp4"];
        for bad in [["-d", "5"], ["-a", "4:3"], ["-m", "veo2"]] {
            let res = VideoArgs::try_parse_from(base.into_iter().chain(bad));
            assert!(res.is_err(), "{bad:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn generates_and_downloads() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("clips/cat.mp4");
        let transport = Arc::new(
            FakeTransport::new()
                .reply_json(200, json!({"code": 0, "data": {"id": "vid-1"}}))
                .reply_json(200, json!({"code": 0, "data": {"status": "running", "progress": 50}}))
                .reply_json(
                    200,
                    json!({"code": 0, "data": {"status": "succeeded", "url": "https://cdn/cat.mp4", "credits_cost": 300}}),
                )
                .reply(200, vec![7u8; 4096]),
        );
        let mut stdout: Vec<u8> = vec![];

        let outcome = run(
            args(&["-p", "a cat", "-f", dest.to_str().unwrap(), "-d", "6"]),
            &env_with_key(),
            transport.clone(),
            ManualClock::new(),
            &mut stdout,
        )
        .await
        .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), vec![7u8; 4096]);
        assert_eq!(outcome.media.size_bytes, 4096);
        assert_eq!(outcome.media.credits.as_deref(), Some("300"));
        assert_eq!(outcome.resolution, "720p");
        assert_eq!(outcome.duration_seconds, 6);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].body.as_ref().unwrap()["durationSeconds"], 6);
        assert_eq!(requests[3].method, "GET");
        assert_eq!(requests[3].url, "https://cdn/cat.mp4");

        let printed = String::from_utf8(stdout).unwrap();
        assert!(printed.starts_with("Video saved: "));
        assert!(printed.contains("(4 KB)"));
    }

    #[tokio::test]
    async fn succeeded_without_url_is_protocol_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("x.mp4");
        let transport = Arc::new(
            FakeTransport::new()
                .reply_json(200, json!({"code": 0, "data": {"id": "vid-2"}}))
                .reply_json(200, json!({"code": 0, "data": {"status": "succeeded"}})),
        );

        let res = run(
            args(&["-p", "a cat", "-f", dest.to_str().unwrap()]),
            &env_with_key(),
            transport.clone(),
            ManualClock::new(),
            &mut io::sink(),
        )
        .await;

        assert!(matches!(res, Err(SkillError::ProtocolError { .. })));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn first_frame_must_exist() {
        let transport = Arc::new(FakeTransport::new());
        let res = run(
            args(&["-p", "a cat", "-f", "o.mp4", "-i", "/missing/frame.png"]),
            &env_with_key(),
            transport.clone(),
            ManualClock::new(),
            &mut io::sink(),
        )
        .await;

        assert!(matches!(
            res,
            Err(SkillError::InvalidInput(InputError::ImageNotFound(_)))
        ));
        assert_eq!(transport.request_count(), 0);
    }
}
