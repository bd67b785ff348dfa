//! 逐通道校正结果.
//!
//! 每个通道要么被校正, 要么原样通过 (相位为零). 两种结果在报告中可以明确区分,
//! 以便下游质量审查定位降级的通道.

use std::fmt;

use super::model::{PhaseModel, PhaseProfile};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 通道未被校正的原因.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PassReason {
    /// 有效列不足, 信号太弱 (例如噪声扫描).
    LowSignal {
        /// 实际有效列数.
        valid_columns: usize,

        /// 至少需要的有效列数.
        required: usize,
    },

    /// 一次模型无法拟合 (退化输入或非有限值).
    FitFailure,
}

impl fmt::Display for PassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowSignal {
                valid_columns,
                required,
            } => write!(f, "low signal ({valid_columns} of {required} valid columns)"),
            Self::FitFailure => write!(f, "phase fit failed"),
        }
    }
}

/// 单个通道的校正结果.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelOutcome {
    /// 已按拟合得到的模型校正奇数行.
    Corrected {
        /// 拟合得到的一次相位模型.
        model: PhaseModel,

        /// 参与拟合的有效列数.
        valid_columns: usize,
    },

    /// 未校正, 奇数行与极性归一化后的输入一致.
    PassThrough(PassReason),
}

impl ChannelOutcome {
    /// 是否被校正.
    #[inline]
    pub fn is_corrected(&self) -> bool {
        matches!(self, Self::Corrected { .. })
    }

    /// 拟合得到的相位模型. 未校正时为 `None`.
    #[inline]
    pub fn model(&self) -> Option<PhaseModel> {
        match *self {
            Self::Corrected { model, .. } => Some(model),
            Self::PassThrough(_) => None,
        }
    }

    /// 未校正的原因. 已校正时为 `None`.
    #[inline]
    pub fn pass_reason(&self) -> Option<PassReason> {
        match *self {
            Self::Corrected { .. } => None,
            Self::PassThrough(r) => Some(r),
        }
    }
}

/// 单个通道的结果及实际使用的相位.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelReport {
    outcome: ChannelOutcome,
    profile: PhaseProfile,
}

impl ChannelReport {
    #[inline]
    pub(crate) fn new(outcome: ChannelOutcome, profile: PhaseProfile) -> Self {
        Self { outcome, profile }
    }

    /// 校正结果.
    #[inline]
    pub fn outcome(&self) -> ChannelOutcome {
        self.outcome
    }

    /// 实际施加到奇数行的相位. 未校正时全为零.
    #[inline]
    pub fn profile(&self) -> &PhaseProfile {
        &self.profile
    }
}

/// 按通道顺序排列的校正报告.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GhostReport {
    channels: Vec<ChannelReport>,
}

impl FromIterator<ChannelReport> for GhostReport {
    fn from_iter<I: IntoIterator<Item = ChannelReport>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

impl GhostReport {
    /// 通道个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// 判断是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// 获得第 `channel` 个通道的报告.
    ///
    /// 当 `channel` 越界时 panic.
    #[inline]
    pub fn channel(&self, channel: usize) -> &ChannelReport {
        &self.channels[channel]
    }

    /// 按通道顺序迭代所有报告.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ChannelReport> + '_ {
        self.channels.iter()
    }

    /// 按通道顺序迭代所有结果.
    #[inline]
    pub fn outcomes(&self) -> impl ExactSizeIterator<Item = ChannelOutcome> + '_ {
        self.channels.iter().map(ChannelReport::outcome)
    }

    /// 被校正的通道个数.
    pub fn corrected_count(&self) -> usize {
        self.outcomes().filter(ChannelOutcome::is_corrected).count()
    }

    /// 获取所有未校正通道的 `(通道索引, 原因)`.
    pub fn pass_through(&self) -> impl Iterator<Item = (usize, PassReason)> + '_ {
        self.outcomes()
            .enumerate()
            .filter_map(|(ch, o)| o.pass_reason().map(|r| (ch, r)))
    }

    /// 是否所有通道都被校正.
    #[inline]
    pub fn is_fully_corrected(&self) -> bool {
        self.corrected_count() == self.len()
    }
}
