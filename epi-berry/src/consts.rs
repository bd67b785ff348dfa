//! 通用常量.

/// 导航回波 (reference line) 相关常量.
pub mod navigator {
    /// 校正实际消费的导航回波条数. 多余的导航回波会被忽略.
    pub const NAVIGATOR_COUNT: usize = 3;

    /// 与偶数行读出极性相同 (正极性) 的两条导航回波索引.
    /// 两者关于负极性导航回波时间对称, 取平均后作为同一时刻的正极性参考.
    pub const POSITIVE_NAVIGATORS: [usize; 2] = [0, 2];

    /// 与奇数行读出极性相同 (负极性) 的导航回波索引.
    pub const NEGATIVE_NAVIGATOR: usize = 1;
}

/// 掩模门限: 某列的平均幅值超过该通道最大幅值的这一比例时, 才参与相位拟合.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.1;

/// 一个通道至少需要的有效列数. 不足时该通道不做校正.
pub const DEFAULT_MIN_VALID_COLUMNS: usize = 10;

/// 相位模型 (多项式) 次数. 仅建模常数偏移和线性斜坡.
pub const PHASE_MODEL_DEGREE: u32 = 1;
