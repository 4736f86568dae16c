//! Multimodal "input" contract: `POST /responses`

use serde::{Deserialize, Serialize};

pub(super) const ENDPOINT: &str = "responses";

#[derive(Debug, Serialize)]
pub(super) struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InputPart<'a> {
    InputText { text: &'a str },
    InputImage { image_url: String },
}

impl<'a> ResponsesRequest<'a> {
    pub(super) fn new(model: &'a str, prompt: &'a str, image_base64: &str, max_tokens: u32) -> Self {
        Self {
            model,
            input: vec![InputMessage {
                role: "user",
                content: vec![
                    InputPart::InputText { text: prompt },
                    InputPart::InputImage {
                        image_url: super::jpeg_data_url(image_base64),
                    },
                ],
            }],
            max_output_tokens: max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// The flat `output_text` field, or the first `output_text` content item
pub(super) fn completion_text(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let response: ResponsesResponse = serde_json::from_slice(body)?;
    if let Some(text) = response.output_text.filter(|t| !t.is_empty()) {
        return Ok(Some(text));
    }

    Ok(response
        .output
        .into_iter()
        .flat_map(|item| item.content)
        .filter(|part| part.kind == "output_text")
        .find_map(|part| part.text.filter(|t| !t.is_empty())))
}
