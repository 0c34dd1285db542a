use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::SubmittedArtifact;

/// 分析请求编号（单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 0..=100 的百分比
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const MAX: u8 = 100;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    /// 超过 100 的值截断为 100
    pub fn clamped(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for Percentage {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Percentage::new)
            .ok_or_else(|| format!("百分比必须在 0..=100 之间，收到 {}", value))
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// 进行中的分析请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub artifact: SubmittedArtifact,
}

/// Provider 返回的分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ai_probability: Percentage,
    pub confidence: Percentage,
    pub file_name: String,
    /// 分析的单元数（文本即字数）
    #[serde(alias = "wordCount")]
    pub unit_count: u32,
    #[serde(default)]
    pub detected_patterns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rejects_out_of_range() {
        assert!(Percentage::new(100).is_some());
        assert!(Percentage::new(101).is_none());
        assert!(Percentage::try_from(300u32).is_err());
    }

    #[test]
    fn result_accepts_word_count_alias() {
        let json = r#"{
            "aiProbability": 94,
            "confidence": 88,
            "fileName": "essay.txt",
            "wordCount": 530,
            "detectedPatterns": ["Repetitive phrasing"]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.ai_probability.value(), 94);
        assert_eq!(result.unit_count, 530);
        assert_eq!(result.detected_patterns, vec!["Repetitive phrasing"]);
    }

    #[test]
    fn result_rejects_probability_over_100() {
        let json = r#"{"aiProbability":140,"confidence":88,"fileName":"a.txt","unitCount":1}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }
}
