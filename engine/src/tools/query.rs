//! Text and vision queries against Gemini 3 Pro.

use std::{io::Write, path::Path};

use log::info;

use crate::{
    api::chat::{
        ChatMessage, ChatRequest, Completion, Content, ContentPart, GEMINI_MODEL, ImageUrl,
    },
    attachment::ImageAttachment,
    cli::QueryArgs,
    client::GrsaiClient,
    clock::Clock,
    config::{Config, Env},
    error::{InputError, Result},
    output,
    tools::validate_prompt,
    transport::Transport,
};

#[derive(Debug)]
pub struct QueryRequest {
    pub prompt: String,
    pub image: Option<ImageAttachment>,
    pub system_prompt: Option<String>,
}

impl QueryRequest {
    pub fn build(
        prompt: &str,
        image: Option<&Path>,
        system_prompt: Option<&str>,
    ) -> Result<Self, InputError> {
        let prompt = validate_prompt(prompt)?;
        let image = image.map(ImageAttachment::load).transpose()?;
        let system_prompt = system_prompt
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string);

        Ok(Self {
            prompt,
            image,
            system_prompt,
        })
    }

    pub fn mode(&self) -> &'static str {
        if self.image.is_some() {
            "vision"
        } else {
            "text"
        }
    }

    pub fn to_chat(&self) -> ChatRequest {
        let content = match &self.image {
            Some(image) => Content::Parts(vec![
                ContentPart::Text {
                    text: self.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_uri(),
                    },
                },
            ]),
            None => Content::Text(self.prompt.clone()),
        };

        let mut messages = vec![];
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(content));

        ChatRequest {
            model: GEMINI_MODEL.into(),
            messages,
        }
    }
}

pub async fn run(
    args: QueryArgs,
    env: &Env,
    transport: impl Transport,
    clock: impl Clock,
    out: &mut impl Write,
) -> Result<Completion> {
    let config = Config::resolve(args.api_key.as_deref(), env)?;
    let request = QueryRequest::build(
        &args.prompt,
        args.image.as_deref(),
        args.system_prompt.as_deref(),
    )?;

    let client = GrsaiClient::new(config, transport, clock);
    info!("Querying {GEMINI_MODEL} ({})...", request.mode());
    let completion = client.chat(&request.to_chat()).await?;
    if let Some(tokens) = completion.total_tokens {
        info!("Tokens used: {tokens}");
    }

    output::emit_text(out, &completion.text, args.output.as_deref())?;
    Ok(completion)
}
