//! EPI Nyquist (N/2) 伪影校正.
//!
//! 算法流程依次为:
//!
//! 1. 极性归一化: 翻转奇数行和负极性导航回波的读出方向 (见 [`crate::data::polarity`]);
//! 2. 导航回波相位估计: 逐通道计算有效列掩模与解卷绕后的相位差;
//! 3. 相位模型拟合: 在有效列上拟合 `α + β·k`, 并在全部列上求值;
//! 4. 校正: 将 `exp(i·phase)` 乘到该通道的每个奇数行上.
//!
//! 第 2 ~ 4 步在通道之间完全独立. 打开 `rayon` feature 时并行处理各通道,
//! 输出和报告顺序与串行处理完全一致.
//!
//! # 注意
//!
//! 1. 至少需要三条导航回波; 多于三条时仅使用前三条, 其余被忽略 (会记录一条 warning).
//! 2. 单个通道信号不足或拟合失败不会中断整体流程, 该通道原样通过,
//!   结果记录在 [`GhostReport`] 中.

mod apply;
mod config;
mod estimate;
mod model;
mod report;

use log::{debug, warn};
use ndarray::{Array3, ArrayViewMut2, Axis};
use num::Complex;

use crate::consts::navigator::NAVIGATOR_COUNT;
use crate::data::{polarity, KSpace, NavigatorSet, Real};
use crate::error::{ConfigError, ConfigResult};
use estimate::References;

pub use config::{GhostConfig, NavigatorLayout};
pub use estimate::{estimate_phase, unwrap_in_place, NavigatorEstimate};
pub use model::{fit_phase_model, PhaseModel, PhaseProfile};
pub use report::{ChannelOutcome, ChannelReport, GhostReport, PassReason};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 校正后的 k-space 及逐通道报告.
#[derive(Clone, Debug)]
pub struct Corrected<T: Real> {
    /// 校正后的 k-space. 形状和精度与输入一致.
    pub kspace: KSpace<T>,

    /// 按通道顺序排列的校正报告.
    pub report: GhostReport,
}

impl<T: Real> Corrected<T> {
    /// 消费自我, 依次获得 k-space 和报告.
    #[inline]
    pub fn into_parts(self) -> (KSpace<T>, GhostReport) {
        (self.kspace, self.report)
    }
}

/// Nyquist 伪影校正器. 不持有任何可变状态, 可在线程间共享.
#[derive(Copy, Clone, Debug, Default)]
pub struct GhostCorrector {
    config: GhostConfig,
}

impl GhostCorrector {
    /// 以给定参数构建校正器.
    #[inline]
    pub fn new(config: GhostConfig) -> Self {
        Self { config }
    }

    /// 校正参数.
    #[inline]
    pub fn config(&self) -> &GhostConfig {
        &self.config
    }

    /// 校正单个切片.
    ///
    /// 输入不会被修改. 以下情况返回 `Err`, 且不做任何处理:
    ///
    /// - 导航回波少于三条;
    /// - 导航回波与 k-space 的 `(通道, 列)` 形状不一致.
    pub fn correct<T: Real>(
        &self,
        kspace: &KSpace<T>,
        navigators: &NavigatorSet<T>,
    ) -> ConfigResult<Corrected<T>> {
        self.check(kspace, navigators)?;
        let layout = self.config.layout();

        let mut out = polarity::flip_odd_lines(kspace);
        let navigators = polarity::flip_navigator(&navigators.leading(), layout.negative);
        let refs = References::new(&navigators, layout);

        let report = self.for_each_channel(out.data_mut(), &refs);
        debug!(
            "ghost correction done: {} of {} channels corrected",
            report.corrected_count(),
            report.len()
        );

        Ok(Corrected {
            kspace: out,
            report,
        })
    }

    /// 依次校正多个切片 (例如各重复、各层面的采集), 结果与输入一一对应.
    ///
    /// 单个切片的配置错误不影响其它切片.
    pub fn correct_batch<'a, T, I>(&self, slices: I) -> Vec<ConfigResult<Corrected<T>>>
    where
        T: Real,
        I: IntoIterator<Item = (&'a KSpace<T>, &'a NavigatorSet<T>)>,
    {
        slices
            .into_iter()
            .map(|(k, n)| self.correct(k, n))
            .collect()
    }

    fn check<T: Real>(&self, kspace: &KSpace<T>, navigators: &NavigatorSet<T>) -> ConfigResult<()> {
        if navigators.len() < NAVIGATOR_COUNT {
            return Err(ConfigError::TooFewNavigators(
                navigators.len(),
                NAVIGATOR_COUNT,
            ));
        }
        if navigators.line_shape() != kspace.line_shape() {
            return Err(ConfigError::ShapeMismatch {
                kspace: kspace.line_shape(),
                navigator: navigators.line_shape(),
            });
        }
        if navigators.surplus() > 0 {
            warn!(
                "{} navigator lines supplied, only the first {NAVIGATOR_COUNT} are used",
                navigators.len()
            );
        }
        Ok(())
    }

    fn for_each_channel<T: Real>(
        &self,
        out: &mut Array3<Complex<T>>,
        refs: &References<T>,
    ) -> GhostReport {
        let channels = out.axis_iter_mut(Axis(1));

        #[cfg(feature = "rayon")]
        let reports: Vec<ChannelReport> = channels
            .into_par_iter()
            .enumerate()
            .map(|(ch, lines)| self.correct_channel(ch, lines, refs))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let reports: Vec<ChannelReport> = channels
            .enumerate()
            .map(|(ch, lines)| self.correct_channel(ch, lines, refs))
            .collect();

        reports.into_iter().collect()
    }

    /// 校正单个通道 `(line, column)` 数据, 仅写入该通道自己的切片.
    fn correct_channel<T: Real>(
        &self,
        channel: usize,
        lines: ArrayViewMut2<Complex<T>>,
        refs: &References<T>,
    ) -> ChannelReport {
        let n_columns = lines.len_of(Axis(1));
        let (positive, negative) = refs.channel(channel);

        let fitted = estimate_phase(positive, negative, &self.config)
            .and_then(|e| fit_phase_model(&e).map(|model| (model, e.valid_columns())));

        match fitted {
            Ok((model, valid_columns)) => {
                debug!(
                    "channel {channel}: alpha = {:.4} rad, beta = {:.6} rad/column, {valid_columns} valid columns",
                    model.alpha, model.beta
                );
                let profile = model.profile(n_columns);
                apply::apply_to_odd_lines(lines, profile.factor::<T>().view());
                ChannelReport::new(
                    ChannelOutcome::Corrected {
                        model,
                        valid_columns,
                    },
                    profile,
                )
            }
            Err(reason) => {
                warn!("channel {channel} passed through uncorrected: {reason}");
                ChannelReport::new(
                    ChannelOutcome::PassThrough(reason),
                    PhaseProfile::zeros(n_columns),
                )
            }
        }
    }
}

/// 以默认参数校正单个切片. 见 [`GhostCorrector::correct`].
#[inline]
pub fn correct<T: Real>(
    kspace: &KSpace<T>,
    navigators: &NavigatorSet<T>,
) -> ConfigResult<Corrected<T>> {
    GhostCorrector::default().correct(kspace, navigators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_channel_loop_matches_sequential() {
        let (n_lines, n_channels, n_columns) = (6, 5, 32);
        // 第 2 个通道的导航回波全为零, 其余通道各有不同的相位误差.
        let navs = Array3::from_shape_fn((3, n_channels, n_columns), |(i, c, k)| {
            let m = if c == 2 { 0.0 } else { 1.0 + 0.5 * (0.3 * k as f64).sin() };
            let phase = if i == 1 {
                -(0.2 * c as f64 + 0.03 * k as f64)
            } else {
                0.1 * k as f64
            };
            Complex::from_polar(m, phase)
        });
        let navs = NavigatorSet::new(navs);
        let refs = References::new(&navs, NavigatorLayout::default());
        let kspace = Array3::from_shape_fn((n_lines, n_channels, n_columns), |(l, c, k)| {
            Complex::new(l as f64 + 1.0, (c * n_columns + k) as f64)
        });
        let corrector = GhostCorrector::default();

        let mut looped = kspace.clone();
        let looped_report = corrector.for_each_channel(&mut looped, &refs);

        let mut sequential = kspace.clone();
        let sequential_report: GhostReport = sequential
            .axis_iter_mut(Axis(1))
            .enumerate()
            .map(|(ch, lines)| corrector.correct_channel(ch, lines, &refs))
            .collect();

        assert_eq!(looped, sequential);
        assert_eq!(looped_report, sequential_report);
        assert_ne!(looped, kspace);
        assert_eq!(looped_report.corrected_count(), n_channels - 1);
        assert_eq!(
            looped_report.channel(2).outcome().pass_reason(),
            Some(PassReason::LowSignal {
                valid_columns: 0,
                required: 10,
            })
        );
    }
}
