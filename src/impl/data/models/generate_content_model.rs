// Wire types for the `generateContent` endpoint.
// ---

#[derive(Debug, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequestModel<'a> {
    pub contents: Vec<ContentRequestModel<'a>>,
    pub generation_config: GenerationConfigModel,
}

#[derive(Debug, serde_derive::Serialize)]
pub(crate) struct ContentRequestModel<'a> {
    pub parts: Vec<PartRequestModel<'a>>,
}

#[derive(Debug, serde_derive::Serialize)]
#[serde(untagged)]
pub(crate) enum PartRequestModel<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataModel<'a>,
    },
}

#[derive(Debug, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataModel<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

#[derive(Debug, serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfigModel {
    pub response_mime_type: &'static str,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Default, serde_derive::Deserialize)]
pub(crate) struct GenerateContentResponseModel {
    #[serde(default)]
    pub candidates: Vec<CandidateModel>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct CandidateModel {
    pub content: Option<ContentResponseModel>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct ContentResponseModel {
    #[serde(default)]
    pub parts: Vec<PartResponseModel>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct PartResponseModel {
    pub text: Option<String>,
}

impl GenerateContentResponseModel {
    /// Concatenated text parts of the first candidate, if it has any text.
    pub(crate) fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateContentResponseModel = serde_json::from_str(
            r#"{
                "candidates": [
                    { "content": { "parts": [ { "text": "{\"isReadable\":" }, { "text": " false}" } ] } },
                    { "content": { "parts": [ { "text": "ignored" } ] } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("{\"isReadable\": false}"));
    }

    #[test]
    fn empty_response_has_no_text() {
        let response: GenerateContentResponseModel = serde_json::from_str("{}").unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn request_uses_inline_data_part() {
        let request = GenerateContentRequestModel {
            contents: vec![ContentRequestModel {
                parts: vec![
                    PartRequestModel::Text { text: "read this" },
                    PartRequestModel::InlineData {
                        inline_data: InlineDataModel {
                            mime_type: "image/jpeg",
                            data: "AAAA",
                        },
                    },
                ],
            }],
            generation_config: GenerationConfigModel {
                response_mime_type: "application/json",
                response_schema: serde_json::json!({ "type": "OBJECT" }),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "read this");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }
}
