//! Client for an Ollama-compatible chat endpoint. The interpret flow sends
//! the assembled record plus the caller's question and pipes the streamed
//! NDJSON reply through [`crate::stream::NdjsonText`].

use bytes::Bytes;
use futures_util::Stream;
use serde_json::json;
use thiserror::Error;

use crate::parse::FortuneRecord;

/// Fixed interpreter persona. The record data travels in the user message.
pub const INTERPRETER_PROMPT: &str = "你是一位資深的解籤師，熟悉台灣廟宇的籤詩傳統。\
請依據提供的籤詩原文、籤品與各解籤欄位，針對用戶的問題給出溫和、具體、務實的解讀。\
先簡述籤意，再回應問題本身，最後給一句提醒。請使用繁體中文回答，不要編造籤詩內容。";

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("generation backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Start a streamed chat completion and hand back the raw NDJSON byte
    /// stream. A non-success status is read to completion and reported as a
    /// gateway failure.
    pub async fn chat_stream(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<impl Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static, OllamaError>
    {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message},
            ],
            "stream": true,
        });

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OllamaError::Status { status, body });
        }

        Ok(response.bytes_stream())
    }
}

/// Lay out one record plus the caller's question as the user message.
pub fn interpretation_request(
    system_name: &str,
    record: &FortuneRecord,
    question: &str,
) -> String {
    let mut message = String::new();
    message.push_str(&format!("籤詩系統：{system_name}\n"));
    message.push_str(&format!("籤號：{}\n", record.display_label));
    if let Some(rank) = &record.rank {
        message.push_str(&format!("籤品：{rank}\n"));
    }
    if let Some(attribute) = &record.attribute {
        message.push_str(&format!("屬性：{attribute}\n"));
    }

    message.push_str("\n籤詩原文：\n");
    message.push_str(&record.verse_lines.join("\n"));
    message.push('\n');

    if let Some(narrative) = &record.narrative {
        message.push_str(&format!("\n典故：{narrative}\n"));
    }
    if let Some(body) = &record.narrative_body {
        message.push_str(&format!("\n{body}\n"));
    }

    // HashMap iteration order varies per run; sort so the same record
    // always yields the same prompt
    let mut sections: Vec<(&String, &String)> = record.sections.iter().collect();
    sections.sort_by_key(|&(label, _)| label);
    for (label, body) in sections {
        message.push_str(&format!("\n【{label}】\n{body}\n"));
    }

    message.push_str(&format!(
        "\n---\n用戶的問題：{question}\n\n請根據以上籤詩資料，針對用戶的問題提供客製化解讀。"
    ));
    message
}
