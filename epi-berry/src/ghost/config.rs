//! 校正参数.

use crate::consts::navigator::{NAVIGATOR_COUNT, NEGATIVE_NAVIGATOR, POSITIVE_NAVIGATORS};
use crate::consts::{DEFAULT_MIN_VALID_COLUMNS, DEFAULT_THRESHOLD_RATIO};
use crate::error::{ConfigError, ConfigResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 导航回波布局: 哪两条是正极性参考, 哪一条是负极性参考.
///
/// 所有索引都必须互不相同, 且落在被消费的前 `NAVIGATOR_COUNT` 条以内.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavigatorLayout {
    /// 两条正极性导航回波, 取平均后作为正极性参考.
    pub positive: [usize; 2],

    /// 负极性导航回波. 归一化时该条会被翻转.
    pub negative: usize,
}

impl Default for NavigatorLayout {
    #[inline]
    fn default() -> Self {
        Self {
            positive: POSITIVE_NAVIGATORS,
            negative: NEGATIVE_NAVIGATOR,
        }
    }
}

impl NavigatorLayout {
    /// 布局是否合法.
    pub fn is_valid(&self) -> bool {
        let [a, b] = self.positive;
        let n = self.negative;
        [a, b, n].iter().all(|&i| i < NAVIGATOR_COUNT) && a != b && a != n && b != n
    }
}

/// Nyquist 伪影校正参数.
///
/// 该对象是只读的. 若要修改参数, 使用 `with_*` 方法获得新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GhostConfig {
    threshold_ratio: f64,
    min_valid_columns: usize,
    layout: NavigatorLayout,
}

impl Default for GhostConfig {
    /// 门限比例 0.1, 最少 10 个有效列, 导航回波 0 和 2 的平均对比导航回波 1.
    #[inline]
    fn default() -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            min_valid_columns: DEFAULT_MIN_VALID_COLUMNS,
            layout: NavigatorLayout::default(),
        }
    }
}

impl GhostConfig {
    /// 构建校正参数. 参数不在合理范围内时返回 `Err`.
    ///
    /// - `threshold_ratio` 必须在 `[0, 1)` 内;
    /// - `min_valid_columns` 至少为 2;
    /// - `layout` 必须合法, 见 [`NavigatorLayout`].
    pub fn new(
        threshold_ratio: f64,
        min_valid_columns: usize,
        layout: NavigatorLayout,
    ) -> ConfigResult<Self> {
        Self {
            threshold_ratio,
            min_valid_columns,
            layout,
        }
        .validate()
    }

    /// 替换门限比例.
    #[inline]
    pub fn with_threshold_ratio(self, threshold_ratio: f64) -> ConfigResult<Self> {
        Self::new(threshold_ratio, self.min_valid_columns, self.layout)
    }

    /// 替换最少有效列数.
    #[inline]
    pub fn with_min_valid_columns(self, min_valid_columns: usize) -> ConfigResult<Self> {
        Self::new(self.threshold_ratio, min_valid_columns, self.layout)
    }

    /// 替换导航回波布局.
    #[inline]
    pub fn with_layout(self, layout: NavigatorLayout) -> ConfigResult<Self> {
        Self::new(self.threshold_ratio, self.min_valid_columns, layout)
    }

    /// 掩模门限比例.
    #[inline]
    pub fn threshold_ratio(&self) -> f64 {
        self.threshold_ratio
    }

    /// 最少有效列数.
    #[inline]
    pub fn min_valid_columns(&self) -> usize {
        self.min_valid_columns
    }

    /// 导航回波布局.
    #[inline]
    pub fn layout(&self) -> NavigatorLayout {
        self.layout
    }

    /// 检查参数. 反序列化得到的对象也应经过这一步.
    pub fn validate(self) -> ConfigResult<Self> {
        if !(0.0..1.0).contains(&self.threshold_ratio) {
            return Err(ConfigError::InvalidThreshold(self.threshold_ratio));
        }
        if self.min_valid_columns < 2 {
            return Err(ConfigError::TooFewValidColumns(self.min_valid_columns));
        }
        if !self.layout.is_valid() {
            return Err(ConfigError::InvalidLayout(self.layout));
        }
        Ok(self)
    }
}
