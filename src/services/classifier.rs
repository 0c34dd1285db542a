//! 结果分级
//!
//! 把 AI 概率映射成四档严重程度。纯函数，无状态。

use serde::Serialize;

use crate::models::Percentage;
use crate::services::tiers::TierTable;

/// 严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SeverityBand {
    VeryLow,
    Low,
    Medium,
    High,
}

/// 阈值：<=25, <=50, <=75, >75
const BANDS: TierTable<u8, SeverityBand> = TierTable::new(&[
    (0, SeverityBand::VeryLow),
    (26, SeverityBand::Low),
    (51, SeverityBand::Medium),
    (76, SeverityBand::High),
]);

/// 徽章样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Secondary,
    Outline,
    Destructive,
}

/// 结果图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BandIcon {
    Check,
    Info,
    Alert,
    Cross,
}

impl SeverityBand {
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::VeryLow => "Very Likely Human",
            SeverityBand::Low => "Likely Human",
            SeverityBand::Medium => "Possibly AI Generated",
            SeverityBand::High => "Likely AI Generated",
        }
    }

    pub fn badge(self) -> BadgeVariant {
        match self {
            SeverityBand::VeryLow | SeverityBand::Medium => BadgeVariant::Secondary,
            SeverityBand::Low => BadgeVariant::Outline,
            SeverityBand::High => BadgeVariant::Destructive,
        }
    }

    /// 颜色标记
    pub fn tone(self) -> &'static str {
        match self {
            SeverityBand::VeryLow => "ai-very-low",
            SeverityBand::Low => "ai-low",
            SeverityBand::Medium => "ai-medium",
            SeverityBand::High => "ai-high",
        }
    }

    pub fn icon(self) -> BandIcon {
        match self {
            SeverityBand::VeryLow => BandIcon::Check,
            SeverityBand::Low => BandIcon::Info,
            SeverityBand::Medium => BandIcon::Alert,
            SeverityBand::High => BandIcon::Cross,
        }
    }

    pub fn all() -> impl Iterator<Item = SeverityBand> {
        BANDS.tiers()
    }
}

/// 分级结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub band: SeverityBand,
    pub label: &'static str,
    pub badge: BadgeVariant,
}

pub fn classify(ai_probability: Percentage) -> Classification {
    let band = BANDS.pick(ai_probability.value());
    Classification {
        band,
        label: band.label(),
        badge: band.badge(),
    }
}
