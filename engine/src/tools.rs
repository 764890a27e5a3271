use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::info;
use serde::Serialize;
use strum::{Display, EnumIter};

use crate::{
    client::GrsaiClient,
    clock::Clock,
    error::{InputError, Result, SkillError},
    output,
    transport::Transport,
};

pub mod image;
pub mod query;
pub mod video;

#[derive(Debug, Clone, Copy, Display, clap::ValueEnum, PartialEq, Eq, EnumIter, Default)]
pub enum AspectRatio {
    #[default]
    #[value(name = "16:9")]
    #[strum(to_string = "16:9")]
    Landscape,
    #[value(name = "9:16")]
    #[strum(to_string = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn api_value(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

/// Rejects empty and whitespace-only prompts. The prompt is sent as typed.
pub fn validate_prompt(prompt: &str) -> Result<String, InputError> {
    if prompt.trim().is_empty() {
        return Err(InputError::EmptyPrompt);
    }
    Ok(prompt.to_string())
}

fn preview(prompt: &str) -> String {
    const MAX: usize = 100;
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(MAX).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaOutcome {
    pub path: PathBuf,
    pub size_bytes: usize,
    pub credits: Option<String>,
}

/// Submit, poll, download and save. Shared by the image and video tools.
pub(crate) async fn render<T: Transport, C: Clock>(
    client: &GrsaiClient<T, C>,
    endpoint: &str,
    body: &impl Serialize,
    kind: &str,
    dest: &Path,
    out: &mut impl Write,
) -> Result<MediaOutcome> {
    let result = client.generate(endpoint, body).await?;
    let credits = result.credits();
    info!(
        "Generation complete! Credits used: {}",
        credits.as_deref().unwrap_or("unknown")
    );

    let url = result
        .media_url()
        .ok_or_else(|| SkillError::protocol(format!("No {kind} URL in result: {result:?}")))?;
    info!("Downloading {kind} from: {}", preview(url));
    let bytes = client.download(url).await?;

    let path = output::emit_media(out, kind, dest, &bytes)?;
    Ok(MediaOutcome {
        path,
        size_bytes: bytes.len(),
        credits,
    })
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn prompt_validation() {
        assert!(matches!(validate_prompt(""), Err(InputError::EmptyPrompt)));
        assert!(matches!(
            validate_prompt(" \t\n "),
            Err(InputError::EmptyPrompt)
        ));
        assert_eq!(validate_prompt(" a cat ").unwrap(), " a cat ");
    }

    #[test]
    fn aspect_ratio_display_matches_api_value() {
        for ratio in AspectRatio::iter() {
            assert_eq!(ratio.to_string(), ratio.api_value());
        }
    }

    #[test]
    fn long_prompts_are_shortened_for_logs() {
        assert_eq!(preview("short"), "short");
        let long = "ü".repeat(150);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));
    }
}
