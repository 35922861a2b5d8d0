use serde::Serialize;

/// Popup shown when a feature is clicked. `{field}` placeholders in
/// `content` are filled in by the SDK from the feature's properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupTemplate {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_infos: Vec<FieldInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFormat {
    pub date_format: DateFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateFormat {
    ShortDateShortTime,
}

impl PopupTemplate {
    pub fn earthquakes() -> Self {
        Self {
            title: "Earthquake Info".to_string(),
            content: "Magnitude {mag} {type} hit {place} on {time}".to_string(),
            field_infos: vec![FieldInfo {
                field_name: "time".to_string(),
                format: Some(FieldFormat {
                    date_format: DateFormat::ShortDateShortTime,
                }),
            }],
        }
    }

    /// Field names referenced by `{...}` in the content, in order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut found = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                break;
            };
            let name = after[..close].trim();
            if !name.is_empty() {
                found.push(name);
            }
            rest = &after[close + 1..];
        }
        found
    }
}
