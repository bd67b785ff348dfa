//! 集成测试共用的合成采集.

#![allow(dead_code)]

use epi_berry::prelude::*;
use ndarray::Array3;
use num::Complex;
use std::sync::Once;

static LOGGER: Once = Once::new();

/// 打开 debug 级别日志. 可重复调用.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = simple_logger::SimpleLogger::new()
            .with_level(log::LevelFilter::Debug)
            .init();
    });
}

/// 一次合成采集. `normalized` 是极性归一化以后的 k-space, `ideal` 是无伪影的 k-space.
pub struct Synthetic {
    pub kspace: KSpace<f64>,
    pub navigators: NavigatorSet<f64>,
    pub normalized: KSpace<f64>,
    pub ideal: Array3<Complex64>,
}

/// 列方向的高斯包络, 边缘约为峰值的 2%.
pub fn envelope(k: usize, n_columns: usize) -> f64 {
    let center = n_columns as f64 / 2.0;
    let width = n_columns as f64 / 4.0;
    (-((k as f64 - center) / width).powi(2)).exp()
}

/// 构建合成采集: 第 `c` 个通道奇数行带有 `-(alpha + beta * k)` 的相位误差.
pub fn acquisition(
    n_lines: usize,
    n_columns: usize,
    phases: &[(f64, f64)],
    magnitude: impl Fn(usize) -> f64,
) -> Synthetic {
    let n_channels = phases.len();
    let error = |c: usize, k: usize| {
        let (alpha, beta) = phases[c];
        Complex::cis(-(alpha + beta * k as f64))
    };

    let ideal = Array3::from_shape_fn((n_lines, n_channels, n_columns), |(l, c, k)| {
        Complex::from_polar(magnitude(k), 0.1 * l as f64 + 0.3 * c as f64 + 0.02 * k as f64)
    });
    let mut normalized = ideal.clone();
    for ((l, c, k), v) in normalized.indexed_iter_mut() {
        if l % 2 == 1 {
            *v *= error(c, k);
        }
    }

    let mut navs = Array3::from_shape_fn((3, n_channels, n_columns), |(_, c, k)| {
        Complex::from_polar(magnitude(k), 0.5 * c as f64 - 0.01 * k as f64)
    });
    for ((n, c, k), v) in navs.indexed_iter_mut() {
        if n == 1 {
            *v *= error(c, k);
        }
    }

    let normalized = KSpace::new(normalized);
    Synthetic {
        kspace: flip_odd_lines(&normalized),
        navigators: flip_navigator(&NavigatorSet::new(navs), 1),
        normalized,
        ideal,
    }
}

/// 转为单精度.
pub fn to_f32(kspace: &KSpace<f64>, navigators: &NavigatorSet<f64>) -> (KSpace<f32>, NavigatorSet<f32>) {
    let narrow = |c: &Complex64| Complex::new(c.re as f32, c.im as f32);
    (
        KSpace::new(kspace.data().map(narrow)),
        NavigatorSet::new(navigators.data().map(narrow)),
    )
}

/// 两个数组逐元素的最大距离.
pub fn max_distance(a: &Array3<Complex64>, b: &Array3<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}
