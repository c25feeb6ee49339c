use super::{gemini::GeminiClient, types::*};
use crate::{
    Error, Result,
    config::{LlmConfig, LlmProvider},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use serde_json::{Map, Value};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

/// A model endpoint that can answer one prompt under a response schema.
///
/// Implementations perform exactly one request per call and return the raw
/// text the model produced. Interpreting that text is the caller's job.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_structured(&self, request: StructuredRequest) -> Result<String>;

    fn model(&self) -> String;
}

/// Builds the client for the configured provider.
///
/// Fails when no credential is configured; the service cannot start without one.
pub fn create_llm_client(config: LlmConfig) -> Result<Arc<dyn LlmClient>> {
    info!(
        "Creating {:?} client for model {}",
        config.provider, config.model
    );

    match config.provider {
        LlmProvider::Gemini => Ok(Arc::new(GeminiClient::new(config)?)),
        LlmProvider::OpenAi => Ok(Arc::new(OpenAiClient::new(config)?)),
    }
}

pub(crate) fn require_api_key(config: &LlmConfig) -> Result<()> {
    if config.api_key.trim().is_empty() {
        return Err(Error::config(
            "API key is not set (configure llm.api_key or the API_KEY environment variable)",
        ));
    }
    Ok(())
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        require_api_key(&config)?;

        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        // One attempt per request: rate limits surface immediately
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retry);

        Ok(Self {
            client,
            model: config.model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate_structured(&self, request: StructuredRequest) -> Result<String> {
        debug!("Creating structured chat completion with model {}", self.model);

        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(ChatCompletionRequestSystemMessageContent::Text(
                request.system_instruction,
            ))
            .build()
            .map_err(|e| Error::llm(format!("Failed to build system message: {}", e)))?;

        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Text(request.prompt))
            .build()
            .map_err(|e| Error::llm(format!("Failed to build user message: {}", e)))?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![system.into(), user.into()];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: "match_prediction".to_string(),
                schema: Some(to_json_schema(&request.response_schema)),
                strict: Some(true),
            },
        };

        let openai_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .response_format(response_format)
            .build()?;

        let response = self.client.chat().create(openai_request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        let Some(choice) = response.choices.into_iter().next() else {
            return Ok(String::new());
        };

        if let Some(refusal) = choice.message.refusal {
            return Err(Error::llm(format!("Model refused the request: {}", refusal)));
        }

        Ok(choice.message.content.unwrap_or_default())
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

/// Converts a Gemini-style schema into strict JSON Schema.
///
/// Type names are lower-cased and every object gets
/// `additionalProperties: false`, which strict mode requires.
pub fn to_json_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();
    for (key, value) in map {
        let converted = match (key.as_str(), value) {
            ("type", Value::String(t)) => Value::String(t.to_lowercase()),
            ("properties", Value::Object(props)) => Value::Object(
                props
                    .iter()
                    .map(|(name, prop)| (name.clone(), to_json_schema(prop)))
                    .collect(),
            ),
            ("items", items) => to_json_schema(items),
            _ => value.clone(),
        };
        out.insert(key.clone(), converted);
    }

    if out.get("type").and_then(Value::as_str) == Some("object") {
        out.entry("additionalProperties")
            .or_insert(Value::Bool(false));
    }

    Value::Object(out)
}
