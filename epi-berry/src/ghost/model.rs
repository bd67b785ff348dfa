//! 一次相位模型 `phase(k) = α + β·k` 的拟合与求值.

use ndarray::{Array1, ArrayView1};
use num::Complex;

use super::estimate::NavigatorEstimate;
use super::report::PassReason;
use crate::consts::PHASE_MODEL_DEGREE;
use crate::data::Real;
use crate::fitting;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 正负极性之间的一次相位误差模型.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseModel {
    /// 常数 (零阶) 相位偏移, 弧度.
    pub alpha: f64,

    /// 线性 (一阶) 相位斜率, 弧度每列. 对应读出方向的亚采样时延.
    pub beta: f64,
}

impl PhaseModel {
    /// 在第 `column` 列求值.
    #[inline]
    pub fn eval(&self, column: f64) -> f64 {
        self.alpha + self.beta * column
    }

    /// 在全部 `n_columns` 列上求值, 包括掩模以外的列.
    pub fn profile(&self, n_columns: usize) -> PhaseProfile {
        PhaseProfile(Array1::from_shape_fn(n_columns, |k| self.eval(k as f64)))
    }
}

/// 单个通道在每一列上的相位误差估计, 弧度.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhaseProfile(Array1<f64>);

impl PhaseProfile {
    /// 全零相位, 即不做校正.
    #[inline]
    pub fn zeros(n_columns: usize) -> Self {
        Self(Array1::zeros(n_columns))
    }

    /// 逐列相位.
    #[inline]
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    /// 列数.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否不含任何列.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 是否全为零.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }

    /// 单位模校正因子 `exp(i·phase)`.
    pub fn factor<T: Real>(&self) -> Array1<Complex<T>> {
        self.0.mapv(|p| Complex::cis(T::narrow(p)))
    }
}

/// 在有效列上以最小二乘法拟合一次相位模型.
///
/// 拟合退化或结果非有限值时返回 [`PassReason::FitFailure`].
pub fn fit_phase_model(estimate: &NavigatorEstimate) -> Result<PhaseModel, PassReason> {
    let (x, y) = estimate.valid_points();
    let poly = fitting::polynomial(x.view(), y.view(), PHASE_MODEL_DEGREE)
        .ok_or(PassReason::FitFailure)?;

    match poly.coefficients().as_slice() {
        Some(&[alpha, beta]) => Ok(PhaseModel { alpha, beta }),
        _ => Err(PassReason::FitFailure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ghost::config::GhostConfig;
    use crate::ghost::estimate::estimate_phase;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_profile_extrapolates() {
        let m = PhaseModel {
            alpha: 0.5,
            beta: -0.1,
        };
        let p = m.profile(8);
        assert_eq!(p.len(), 8);
        assert!(f64_eq(p.values()[0], 0.5));
        assert!(f64_eq(p.values()[7], -0.2));
        assert!(!p.is_zero());
    }

    #[test]
    fn test_zero_profile_factor_is_one() {
        let p = PhaseProfile::zeros(5);
        assert!(p.is_zero());
        assert!(p
            .factor::<f32>()
            .iter()
            .all(|&c| c == Complex::new(1.0, 0.0)));
    }

    #[test]
    fn test_fit_recovers_wrapped_ramp() {
        // β 较大, 原始相位差会多次卷绕; 掩模外的列含噪声但不参与拟合.
        let n = 64;
        let (alpha, beta) = (-0.7, 0.23);
        let pos = Array1::from_shape_fn(n, |k| {
            let m = if (8..56).contains(&k) { 2.0 } else { 0.05 };
            Complex::from_polar(m, 0.0)
        });
        let neg = Array1::from_shape_fn(n, |k| {
            let noise = if (8..56).contains(&k) { 0.0 } else { 1.3 * k as f64 };
            pos[k] * Complex::cis(-(alpha + beta * k as f64) + noise)
        });

        let e = estimate_phase(pos.view(), neg.view(), &GhostConfig::default()).unwrap();
        let m = fit_phase_model(&e).unwrap();
        assert!(f64_eq(m.beta, beta));

        // 解卷绕从第 0 列开始, 常数项可能相差 2π 的整数倍.
        let k = (m.alpha - alpha) / std::f64::consts::TAU;
        assert!(f64_eq(k, k.round()));
    }

    #[test]
    fn test_fit_failure_on_non_finite_phase() {
        // f32 下 pos * conj(neg) 的虚部为 inf - inf, 相位为 NaN.
        let v = Complex::new(1e20f32, 1e20);
        let pos = Array1::from_elem(16, v);
        let neg = Array1::from_elem(16, v);

        let e = estimate_phase(pos.view(), neg.view(), &GhostConfig::default()).unwrap();
        assert_eq!(e.valid_columns(), 16);
        assert_eq!(fit_phase_model(&e), Err(PassReason::FitFailure));
    }

    #[test]
    fn test_fit_failure_on_nan_outside_mask() {
        // 第 0 列不在掩模内, 但其 NaN 相位会随解卷绕传到后面的有效列.
        let n = 32;
        let mut pos = Array1::from_elem(n, Complex::new(1.0f64, 0.0));
        pos[0] = Complex::new(f64::NAN, 0.0);
        let neg = pos.mapv(|v| v * Complex::cis(-0.4));

        let e = estimate_phase(pos.view(), neg.view(), &GhostConfig::default()).unwrap();
        assert!(!e.mask()[0]);
        assert_eq!(e.valid_columns(), n - 1);
        assert_eq!(fit_phase_model(&e), Err(PassReason::FitFailure));
    }
}
