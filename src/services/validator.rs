//! 文件校验 - 业务能力层
//!
//! 只检查"数量"和"类型"，不读取文件内容。

use phf::{phf_map, phf_set};
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{ArtifactCandidate, SubmittedArtifact};

/// 允许的媒体类型
static ALLOWED_TYPES: phf::Set<&'static str> = phf_set! {
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
};

/// 扩展名 → 媒体类型
static EXTENSION_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    "txt" => "text/plain",
    "pdf" => "application/pdf",
    "doc" => "application/msword",
    "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
};

const UNKNOWN_TYPE: &str = "application/octet-stream";

/// 校验用户的选择，返回唯一的待分析文件
pub fn validate(candidates: &[ArtifactCandidate]) -> Result<SubmittedArtifact, ValidationError> {
    let candidate = match candidates {
        [] => return Err(ValidationError::NoArtifact),
        [single] => single,
        many => {
            return Err(ValidationError::TooManyArtifacts { count: many.len() });
        }
    };

    let mime_type = normalize_mime(&candidate.mime_type);
    if !is_supported(&mime_type) {
        debug!("拒绝文件 {}: 类型 {}", candidate.name, candidate.mime_type);
        return Err(ValidationError::UnsupportedType {
            mime_type: candidate.mime_type.clone(),
        });
    }

    Ok(SubmittedArtifact::new(
        candidate.name.clone(),
        candidate.size_bytes,
        mime_type,
    ))
}

/// 根据文件名猜测媒体类型，未知扩展名返回 `application/octet-stream`
pub fn guess_mime_type(file_name: &str) -> &'static str {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .and_then(|ext| EXTENSION_TYPES.get(ext.as_str()).copied())
        .unwrap_or(UNKNOWN_TYPE)
}

// 参数需已经过 normalize_mime
fn is_supported(mime_type: &str) -> bool {
    ALLOWED_TYPES.contains(mime_type)
}

// "Text/Plain; charset=utf-8" -> "text/plain"
fn normalize_mime(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
