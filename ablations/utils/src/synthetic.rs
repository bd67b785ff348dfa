//! 合成 EPI 采集. 每个通道带有已知的一次相位误差, 便于检查估计精度.

use epi_berry::prelude::*;
use ndarray::Array3;
use num::Complex;

/// 合成采集的几何与信号参数.
#[derive(Clone, Debug)]
pub struct Phantom {
    /// 相位编码行数.
    pub n_lines: usize,

    /// 读出方向列数.
    pub n_columns: usize,

    /// 每个通道的 `(alpha, beta)`. 通道数即该列表长度.
    pub phases: Vec<(f64, f64)>,

    /// 物体占据的列范围, 以列数的比例表示. 范围外只有 `floor` 幅值.
    pub support: (f64, f64),

    /// 物体以外的幅值, 相对于峰值 1.0.
    pub floor: f64,

    /// 导航回波幅值整体缩放. 为 0 时得到纯噪声扫描.
    pub navigator_gain: f64,
}

impl Phantom {
    /// 128 列、64 行, 物体占据中间 70% 的列.
    pub fn new(phases: Vec<(f64, f64)>) -> Self {
        Self {
            n_lines: 64,
            n_columns: 128,
            phases,
            support: (0.15, 0.85),
            floor: 0.02,
            navigator_gain: 1.0,
        }
    }

    /// 第 `k` 列的幅值.
    pub fn magnitude(&self, k: usize) -> f64 {
        let x = k as f64 / self.n_columns as f64;
        let (lo, hi) = self.support;
        if (lo..hi).contains(&x) {
            // 物体内部为平缓的余弦包络.
            let t = (x - lo) / (hi - lo);
            0.5 + 0.5 * (std::f64::consts::PI * t).sin()
        } else {
            self.floor
        }
    }

    /// 通道数.
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.phases.len()
    }

    /// 生成未经极性归一化的采集, 依次返回 k-space 和导航回波组.
    pub fn acquire<T: Real>(&self) -> (KSpace<T>, NavigatorSet<T>) {
        let shape = (self.n_lines, self.n_channels(), self.n_columns);
        let kspace = Array3::from_shape_fn(shape, |(l, c, k)| {
            let v = Complex::from_polar(
                self.magnitude(k),
                0.05 * l as f64 + 0.4 * c as f64 - 0.01 * k as f64,
            );
            narrow(if l % 2 == 1 { v * self.error(c, k) } else { v })
        });

        let navs = Array3::from_shape_fn((3, self.n_channels(), self.n_columns), |(n, c, k)| {
            let v = Complex::from_polar(self.navigator_gain * self.magnitude(k), 0.7 * c as f64);
            narrow(if n == 1 { v * self.error(c, k) } else { v })
        });

        let kspace = flip_odd_lines(&KSpace::new(kspace));
        let navs = flip_navigator(&NavigatorSet::new(navs), 1);
        (kspace, navs)
    }

    /// 奇数行上 `exp(-i (alpha + beta * k))` 的相位误差.
    fn error(&self, channel: usize, k: usize) -> Complex<f64> {
        let (alpha, beta) = self.phases[channel];
        Complex::cis(-(alpha + beta * k as f64))
    }
}

#[inline]
fn narrow<T: Real>(c: Complex<f64>) -> Complex<T> {
    Complex::new(T::narrow(c.re), T::narrow(c.im))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phantom_is_corrected() {
        let phases = vec![(0.3, 0.01), (-1.2, 0.04)];
        let p = Phantom::new(phases.clone());
        let (k, n) = p.acquire::<f64>();
        assert_eq!(k.shape(), (64, 2, 128));

        let out = epi_berry::correct(&k, &n).unwrap();
        for (o, (alpha, beta)) in out.report.outcomes().zip(phases) {
            let m = o.model().unwrap();
            assert!((m.alpha - alpha).abs() < 1e-8);
            assert!((m.beta - beta).abs() < 1e-8);
        }
    }

    #[test]
    fn test_silent_navigators() {
        let mut p = Phantom::new(vec![(0.3, 0.01)]);
        p.navigator_gain = 0.0;
        let (k, n) = p.acquire::<f32>();
        let out = epi_berry::correct(&k, &n).unwrap();
        assert_eq!(out.report.corrected_count(), 0);
    }
}
