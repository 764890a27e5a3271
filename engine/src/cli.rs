use std::path::PathBuf;

use indoc::indoc;

use crate::tools::{
    AspectRatio,
    image::{ImageModel, ImageSize},
    video::{VideoDuration, VideoModel},
};

const ENV_HELP: &str = indoc! {"
    Environment:
      GRSAI_API_KEY    API key, used when --api-key is not given
      GRSAI_BASE_URL   API host override (default: https://grsaiapi.com)
      RUST_LOG         log filter (default: info)
"};

/// Generate text or analyze images using the grsai.com Gemini 3 Pro API
#[derive(Debug, clap::Parser)]
#[command(after_help = ENV_HELP)]
pub struct QueryArgs {
    /// Text prompt or question
    #[arg(short, long)]
    pub prompt: String,

    /// Optional image for vision analysis (jpg, png, webp, gif)
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Optional system instructions
    #[arg(short, long)]
    pub system_prompt: Option<String>,

    /// Also save the response to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// grsai API key (overrides GRSAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}

/// Generate images using the grsai.com nano-banana API
#[derive(Debug, clap::Parser)]
#[command(after_help = ENV_HELP)]
pub struct ImageArgs {
    /// Image description
    #[arg(short, long)]
    pub prompt: String,

    /// Output file, e.g. output.png
    #[arg(short, long)]
    pub filename: PathBuf,

    #[arg(short, long, value_enum, default_value_t)]
    pub model: ImageModel,

    /// Output resolution
    #[arg(long, value_enum, default_value_t)]
    pub size: ImageSize,

    #[arg(short, long, value_enum, default_value_t)]
    pub aspect_ratio: AspectRatio,

    /// Reference image, may be given several times
    #[arg(short, long)]
    pub image: Vec<PathBuf>,

    /// grsai API key (overrides GRSAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}

/// Generate videos using the grsai.com Veo 3.1 API
#[derive(Debug, clap::Parser)]
#[command(after_help = ENV_HELP)]
pub struct VideoArgs {
    /// Video description
    #[arg(short, long)]
    pub prompt: String,

    /// Output file, e.g. output.mp4
    #[arg(short, long)]
    pub filename: PathBuf,

    #[arg(short, long, value_enum, default_value_t)]
    pub model: VideoModel,

    /// Video length in seconds
    #[arg(short, long, value_enum, default_value_t)]
    pub duration: VideoDuration,

    #[arg(short, long, value_enum, default_value_t)]
    pub aspect_ratio: AspectRatio,

    /// Optional first frame to animate
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// grsai API key (overrides GRSAI_API_KEY)
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,
}
