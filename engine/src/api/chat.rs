use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};

pub const GEMINI_MODEL: &str = "gemini-3-pro";

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Content,
}

impl ChatMessage {
    pub fn system(text: String) -> Self {
        Self {
            role: Role::System,
            content: Content::Text(text),
        }
    }

    pub fn user(content: Content) -> Self {
        Self {
            role: Role::User,
            content,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
}

/// Plain text, or text plus images for vision queries.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Option<Vec<Choice>>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct Usage {
    pub total_tokens: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub total_tokens: Option<u64>,
}

impl ChatResponse {
    pub fn into_completion(self) -> Result<Completion> {
        let text = self
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| SkillError::protocol("no 'choices[0].message.content' in response"))?;

        Ok(Completion {
            text,
            total_tokens: self.usage.and_then(|u| u.total_tokens),
        })
    }
}

#[cfg(test)]
mod test {
    use expect_test::expect;

    use super::*;

    #[test]
    fn request_serialization() {
        let req = ChatRequest {
            model: GEMINI_MODEL.into(),
            messages: vec![
                ChatMessage::system("Be brief".into()),
                ChatMessage::user(Content::Parts(vec![
                    ContentPart::Text {
                        text: "What is this?".into(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: "data:image/png;base64,AAAA".into(),
                        },
                    },
                ])),
            ],
        };

        let expect = expect![[r#"
            {
              "model": "gemini-3-pro",
              "messages": [
                {
                  "role": "system",
                  "content": "Be brief"
                },
                {
                  "role": "user",
                  "content": [
                    {
                      "type": "text",
                      "text": "What is this?"
                    },
                    {
                      "type": "image_url",
                      "image_url": {
                        "url": "data:image/png;base64,AAAA"
                      }
                    }
                  ]
                }
              ]
            }"#]];
        expect.assert_eq(&serde_json::to_string_pretty(&req).unwrap());
    }

    #[test]
    fn completion_extraction() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}],"usage":{"total_tokens":42}}"#,
        )
        .unwrap();
        assert_eq!(
            resp.into_completion().unwrap(),
            Completion {
                text: "hello".into(),
                total_tokens: Some(42),
            }
        );
    }

    #[test]
    fn missing_choices_is_protocol_error() {
        for body in [
            r#"{"id":"x"}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
        ] {
            let resp: ChatResponse = serde_json::from_str(body).unwrap();
            assert!(matches!(
                resp.into_completion(),
                Err(SkillError::ProtocolError { .. })
            ));
        }
    }
}
