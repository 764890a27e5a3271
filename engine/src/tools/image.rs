//! Image generation with the nano-banana family.

use std::io::Write;

use log::info;
use strum::{Display, EnumIter};

use crate::{
    api::{IMAGE_PATH, NO_WEBHOOK, draw::ImageGenerationBody},
    attachment::ImageAttachment,
    cli::ImageArgs,
    client::GrsaiClient,
    clock::Clock,
    config::{Config, Env},
    error::{InputError, Result},
    tools::{AspectRatio, MediaOutcome, preview, render, validate_prompt},
    transport::Transport,
};

#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, PartialEq, Eq, EnumIter, Default)]
pub enum ImageModel {
    #[value(name = "nano-banana-fast")]
    #[strum(to_string = "nano-banana-fast")]
    Fast,
    #[default]
    #[value(name = "nano-banana")]
    #[strum(to_string = "nano-banana")]
    Standard,
    #[value(name = "nano-banana-pro")]
    #[strum(to_string = "nano-banana-pro")]
    Pro,
}

impl ImageModel {
    pub fn api_name(&self) -> &'static str {
        match self {
            ImageModel::Fast => "nano-banana-fast",
            ImageModel::Standard => "nano-banana",
            ImageModel::Pro => "nano-banana-pro",
        }
    }
}

/// Output resolution tier.
#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, PartialEq, Eq, EnumIter, Default)]
pub enum ImageSize {
    #[default]
    #[value(name = "1K")]
    #[strum(to_string = "1K")]
    OneK,
    #[value(name = "2K")]
    #[strum(to_string = "2K")]
    TwoK,
    #[value(name = "4K")]
    #[strum(to_string = "4K")]
    FourK,
}

impl ImageSize {
    pub fn api_value(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

#[derive(Debug)]
pub struct ImageJob {
    pub prompt: String,
    pub model: ImageModel,
    pub size: ImageSize,
    pub aspect_ratio: AspectRatio,
    pub references: Vec<ImageAttachment>,
}

impl ImageJob {
    pub fn from_args(args: &ImageArgs) -> Result<Self, InputError> {
        Ok(Self {
            prompt: validate_prompt(&args.prompt)?,
            model: args.model,
            size: args.size,
            aspect_ratio: args.aspect_ratio,
            references: args
                .image
                .iter()
                .map(ImageAttachment::load)
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn body(&self) -> ImageGenerationBody {
        ImageGenerationBody {
            model: self.model.api_name(),
            prompt: self.prompt.clone(),
            aspect_ratio: self.aspect_ratio.api_value(),
            image_size: self.size.api_value(),
            urls: self
                .references
                .iter()
                .map(ImageAttachment::data_uri)
                .collect(),
            web_hook: NO_WEBHOOK,
            shut_progress: false,
        }
    }
}

pub async fn run(
    args: ImageArgs,
    env: &Env,
    transport: impl Transport,
    clock: impl Clock,
    out: &mut impl Write,
) -> Result<MediaOutcome> {
    let config = Config::resolve(args.api_key.as_deref(), env)?;
    let job = ImageJob::from_args(&args)?;

    info!(
        "Generating image: model={}, size={}, aspect={}, references={}",
        job.model,
        job.size,
        job.aspect_ratio,
        job.references.len()
    );
    info!("Prompt: {}", preview(&job.prompt));

    let client = GrsaiClient::new(config, transport, clock);
    render(
        &client,
        IMAGE_PATH,
        &job.body(),
        "Image",
        &args.filename,
        out,
    )
    .await
}
