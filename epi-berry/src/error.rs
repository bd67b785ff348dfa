//! 运行时错误.

use crate::ghost::NavigatorLayout;
use crate::Idx2d;
use std::fmt;

/// 校正前的配置错误. 出现该错误时不会产生任何输出.
///
/// 单个通道的信号不足或拟合失败 **不是** 错误,
/// 它们以 [`crate::ghost::ChannelOutcome`] 的形式出现在校正报告中.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 导航回波不足.
    ///
    /// 第一个参数代表实际提供的条数, 第二个参数代表至少需要的条数.
    TooFewNavigators(usize, usize),

    /// 导航回波与 k-space 的 `(通道, 列)` 形状不一致.
    ShapeMismatch {
        /// k-space 的 `(n_channels, n_columns)`.
        kspace: Idx2d,

        /// 导航回波的 `(n_channels, n_columns)`.
        navigator: Idx2d,
    },

    /// 掩模门限比例不在 `[0, 1)` 范围内.
    InvalidThreshold(f64),

    /// 最少有效列数过小, 直线拟合至少需要两列.
    TooFewValidColumns(usize),

    /// 导航回波布局非法: 索引重复, 或超出被消费的前三条.
    InvalidLayout(NavigatorLayout),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewNavigators(got, need) => {
                write!(f, "expected at least {need} navigator lines, got {got}")
            }
            Self::ShapeMismatch { kspace, navigator } => write!(
                f,
                "navigator shape (channels, columns) = {navigator:?} does not match k-space {kspace:?}"
            ),
            Self::InvalidThreshold(r) => write!(f, "threshold ratio {r} is not in [0, 1)"),
            Self::TooFewValidColumns(n) => {
                write!(f, "minimum valid columns must be at least 2, got {n}")
            }
            Self::InvalidLayout(l) => write!(f, "invalid navigator layout {l:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 配置 / 校正入口的运行时错误.
pub type ConfigResult<T> = Result<T, ConfigError>;
