use std::fmt;

use serde::{Deserialize, Serialize};

/// 用户选择的原始文件（尚未校验）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl ArtifactCandidate {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// 通过校验的待分析文件
///
/// 只能由 `services::validator` 构造，构造后不可修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedArtifact {
    name: String,
    size_bytes: u64,
    mime_type: String,
}

impl SubmittedArtifact {
    pub(crate) fn new(name: String, size_bytes: u64, mime_type: String) -> Self {
        Self {
            name,
            size_bytes,
            mime_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 文件大小（KB，保留一位小数）
    pub fn size_kb(&self) -> String {
        format!("{:.1}", self.size_bytes as f64 / 1024.0)
    }
}

impl fmt::Display for SubmittedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} KB, {})", self.name, self.size_kb(), self.mime_type)
    }
}
