//! 导航回波相位差估计.
//!
//! 对每个通道:
//!
//! 1. 正极性参考为两条正极性导航回波的逐列平均, 负极性参考为 (已翻转的) 负极性导航回波;
//! 2. 两者幅值的平均作为信号强度, 超过该通道最大值一定比例的列记为有效;
//! 3. 相位差取 `arg(pos * conj(neg))`, 这比两个相位直接相减少一次卷绕;
//! 4. 沿读出方向解卷绕.

use std::f64::consts::{PI, TAU};

use itertools::izip;
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use num::Complex;

use super::config::{GhostConfig, NavigatorLayout};
use super::report::PassReason;
use crate::data::{NavigatorSet, Real};

/// 全部通道的正/负极性参考, 形状均为 `(channel, column)`.
#[derive(Debug, Clone)]
pub(crate) struct References<T: Real> {
    positive: Array2<Complex<T>>,
    negative: Array2<Complex<T>>,
}

impl<T: Real> References<T> {
    /// 从已归一化的导航回波组中提取参考.
    pub fn new(navigators: &NavigatorSet<T>, layout: NavigatorLayout) -> Self {
        let [p0, p1] = layout.positive;
        let two = T::one() + T::one();
        let mut positive = navigators.navigator(p0).to_owned();
        Zip::from(&mut positive)
            .and(navigators.navigator(p1))
            .for_each(|a, &b| *a = (*a + b) / two);

        Self {
            positive,
            negative: navigators.navigator(layout.negative).to_owned(),
        }
    }

    /// 第 `channel` 个通道的 `(正极性参考, 负极性参考)`.
    #[inline]
    pub fn channel(
        &self,
        channel: usize,
    ) -> (ArrayView1<'_, Complex<T>>, ArrayView1<'_, Complex<T>>) {
        (
            self.positive.index_axis(Axis(0), channel),
            self.negative.index_axis(Axis(0), channel),
        )
    }
}

/// 单个通道的导航回波相位差估计.
#[derive(Debug, Clone)]
pub struct NavigatorEstimate {
    magnitude: Array1<f64>,
    mask: Array1<bool>,
    phase: Array1<f64>,
    valid: usize,
}

impl NavigatorEstimate {
    /// 逐列平均幅值.
    #[inline]
    pub fn magnitude(&self) -> ArrayView1<'_, f64> {
        self.magnitude.view()
    }

    /// 有效列掩模.
    #[inline]
    pub fn mask(&self) -> ArrayView1<'_, bool> {
        self.mask.view()
    }

    /// 解卷绕后的相位差曲线 (覆盖所有列, 包括无效列).
    #[inline]
    pub fn phase(&self) -> ArrayView1<'_, f64> {
        self.phase.view()
    }

    /// 有效列个数.
    #[inline]
    pub fn valid_columns(&self) -> usize {
        self.valid
    }

    /// 读出方向总列数.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.phase.len()
    }

    /// 依次获取有效列的 `(列索引, 相位)`.
    pub fn valid_points(&self) -> (Array1<f64>, Array1<f64>) {
        let (x, y): (Vec<f64>, Vec<f64>) = izip!(0usize.., self.mask.iter(), self.phase.iter())
            .filter(|&(_, &m, _)| m)
            .map(|(k, _, &p)| (k as f64, p))
            .unzip();
        (Array1::from(x), Array1::from(y))
    }
}

/// 估计单个通道的相位差.
///
/// 有效列少于 `config.min_valid_columns()` 时返回 [`PassReason::LowSignal`].
pub fn estimate_phase<T: Real>(
    positive: ArrayView1<Complex<T>>,
    negative: ArrayView1<Complex<T>>,
    config: &GhostConfig,
) -> Result<NavigatorEstimate, PassReason> {
    debug_assert_eq!(positive.len(), negative.len());
    let two = T::one() + T::one();

    let magnitude: Array1<f64> = Zip::from(&positive)
        .and(&negative)
        .map_collect(|p, n| ((p.norm() + n.norm()) / two).widen());

    let peak = magnitude.iter().copied().fold(0.0, f64::max);
    let threshold = config.threshold_ratio() * peak;
    let mask = magnitude.mapv(|m| m > threshold);
    let valid = mask.iter().filter(|&&m| m).count();

    if valid < config.min_valid_columns() {
        return Err(PassReason::LowSignal {
            valid_columns: valid,
            required: config.min_valid_columns(),
        });
    }

    let mut phase: Array1<f64> = Zip::from(&positive)
        .and(&negative)
        .map_collect(|p, n| (*p * n.conj()).arg().widen());
    if let Some(s) = phase.as_slice_mut() {
        unwrap_in_place(s);
    }

    Ok(NavigatorEstimate {
        magnitude,
        mask,
        phase,
        valid,
    })
}

/// 一维相位解卷绕.
///
/// 相邻差值绝对值不小于 π 时, 将其折回 `[-π, π)`; 恰为 +π 的跳变保留符号.
/// 某列为非有限值时, 其后所有列都变为 NaN.
pub fn unwrap_in_place(phase: &mut [f64]) {
    let Some(&first) = phase.first() else {
        return;
    };

    let mut correction = 0.0;
    let mut prev = first;
    for p in phase.iter_mut().skip(1) {
        let raw = *p;
        let dd = raw - prev;
        // NaN 差值同样进入该分支, 之后所有列的修正量都是 NaN.
        if !(dd.abs() < PI) {
            let mut folded = (dd + PI).rem_euclid(TAU) - PI;
            if folded == -PI && dd > 0.0 {
                folded = PI;
            }
            correction += folded - dd;
        }
        *p = raw + correction;
        prev = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn wrap(v: f64) -> f64 {
        (v + PI).rem_euclid(TAU) - PI
    }

    #[test]
    fn test_unwrap_linear_ramp() {
        let truth: Vec<f64> = (0..40).map(|k| 0.2 + 0.45 * k as f64).collect();
        let mut wrapped: Vec<f64> = truth.iter().copied().map(wrap).collect();
        unwrap_in_place(&mut wrapped);

        // 起点在 (-π, π) 内, 解卷绕结果应与真值完全一致.
        for (a, b) in wrapped.iter().zip(truth.iter()) {
            assert!(f64_eq(*a, *b), "{a} != {b}");
        }
    }

    #[test]
    fn test_unwrap_descending() {
        let truth: Vec<f64> = (0..30).map(|k| -0.6 * k as f64).collect();
        let mut wrapped: Vec<f64> = truth.iter().copied().map(wrap).collect();
        unwrap_in_place(&mut wrapped);
        for (a, b) in wrapped.iter().zip(truth.iter()) {
            assert!(f64_eq(*a, *b));
        }
    }

    #[test]
    fn test_unwrap_corner_cases() {
        let mut empty: [f64; 0] = [];
        unwrap_in_place(&mut empty);

        let mut one = [2.5];
        unwrap_in_place(&mut one);
        assert_eq!(one, [2.5]);

        // 小跳变不动.
        let mut small = [0.0, 3.0, 0.5];
        unwrap_in_place(&mut small);
        assert_eq!(small, [0.0, 3.0, 0.5]);

        // 恰为 +π 的跳变保持为 +π.
        let mut half = [0.0, PI];
        unwrap_in_place(&mut half);
        assert!(f64_eq(half[1], PI));
    }

    #[test]
    fn test_unwrap_nan_propagates() {
        let mut p = [0.5, f64::NAN, 1.0, 2.0];
        unwrap_in_place(&mut p);
        assert_eq!(p[0], 0.5);
        assert!(p[1..].iter().all(|v| v.is_nan()));

        // 末尾的 NaN 不影响之前的列.
        let mut p = [0.5, 1.0, f64::NAN];
        unwrap_in_place(&mut p);
        assert_eq!(&p[..2], &[0.5, 1.0]);
        assert!(p[2].is_nan());
    }

    fn channel_of(
        phi: impl Fn(usize) -> f64,
        mag: impl Fn(usize) -> f64,
        n: usize,
    ) -> (Array1<Complex<f64>>, Array1<Complex<f64>>) {
        let pos = Array1::from_shape_fn(n, |k| Complex::from_polar(mag(k), 0.1 * k as f64));
        let neg = Array1::from_shape_fn(n, |k| pos[k] * Complex::cis(-phi(k)));
        (pos, neg)
    }

    #[test]
    fn test_estimate_mask_and_phase() {
        // 中间 12 列有信号, 两侧各 6 列几乎为 0.
        let n = 24;
        let (pos, neg) = channel_of(
            |k| 0.4 + 0.02 * k as f64,
            |k| if (6..18).contains(&k) { 1.0 } else { 1e-3 },
            n,
        );

        let e = estimate_phase(pos.view(), neg.view(), &GhostConfig::default()).unwrap();
        assert_eq!(e.n_columns(), n);
        assert_eq!(e.valid_columns(), 12);
        for k in 0..n {
            assert_eq!(e.mask()[k], (6..18).contains(&k));
            assert!(f64_eq(e.phase()[k], 0.4 + 0.02 * k as f64));
        }

        let (x, y) = e.valid_points();
        assert_eq!(x.len(), 12);
        assert_eq!(x[0], 6.0);
        assert!(f64_eq(y[0], 0.52));
    }

    #[test]
    fn test_estimate_low_signal() {
        let n = 32;
        // 只有 9 列超过门限.
        let (pos, neg) = channel_of(|_| 0.3, |k| if k < 9 { 1.0 } else { 0.01 }, n);
        let r = estimate_phase(pos.view(), neg.view(), &GhostConfig::default()).unwrap_err();
        assert_eq!(
            r,
            PassReason::LowSignal {
                valid_columns: 9,
                required: 10
            }
        );
    }

    #[test]
    fn test_estimate_all_zero() {
        let z = Array1::<Complex<f32>>::zeros(16);
        let r = estimate_phase(z.view(), z.view(), &GhostConfig::default()).unwrap_err();
        assert!(matches!(r, PassReason::LowSignal { valid_columns: 0, .. }));
    }

    #[test]
    fn test_references_average() {
        use ndarray::Array3;

        let mut data = Array3::<Complex<f64>>::zeros((3, 2, 4));
        data.index_axis_mut(Axis(0), 0).fill(Complex::new(1.0, 0.0));
        data.index_axis_mut(Axis(0), 1).fill(Complex::new(0.0, 5.0));
        data.index_axis_mut(Axis(0), 2).fill(Complex::new(3.0, 2.0));

        let r = References::new(&NavigatorSet::new(data), NavigatorLayout::default());
        let (p, n) = r.channel(1);
        assert!(p.iter().all(|&v| v == Complex::new(2.0, 1.0)));
        assert!(n.iter().all(|&v| v == Complex::new(0.0, 5.0)));
    }
}
