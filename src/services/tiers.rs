//! 阈值分级表
//!
//! "数值 → 离散等级"的通用实现。结果分级和答题评语都基于它。

/// 按下界升序排列的分级表
///
/// 取最后一个下界 `<= value` 的等级；低于所有下界时取第一级，
/// 因此对任意输入都有定义，且输入越大等级越靠后。
#[derive(Debug, Clone, Copy)]
pub struct TierTable<V: 'static, T: 'static> {
    tiers: &'static [(V, T)],
}

impl<V, T> TierTable<V, T>
where
    V: PartialOrd + Copy + 'static,
    T: Copy + 'static,
{
    /// `tiers` 不能为空，且下界必须严格递增
    pub const fn new(tiers: &'static [(V, T)]) -> Self {
        assert!(!tiers.is_empty(), "分级表不能为空");
        Self { tiers }
    }

    pub fn pick(&self, value: V) -> T {
        self.tiers
            .iter()
            .rev()
            .find(|(lower, _)| *lower <= value)
            .map(|(_, tier)| *tier)
            .unwrap_or(self.tiers[0].1)
    }

    pub fn tiers(&self) -> impl Iterator<Item = T> {
        self.tiers.iter().map(|(_, tier)| *tier)
    }
}
