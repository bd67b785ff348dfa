//! 将校正因子施加到奇数行.
//!
//! 偶数行视为相位参考, 全部误差归于奇数行. 这是算法模型的简化, 不在偶数行和奇数行之间均分.

use ndarray::{s, ArrayView1, ArrayViewMut2, Zip};
use num::Complex;

use crate::data::Real;

/// 将 `factor` 逐列乘到单个通道 `(line, column)` 数据的每个奇数行上. 偶数行保持不变.
pub fn apply_to_odd_lines<T: Real>(
    mut lines: ArrayViewMut2<Complex<T>>,
    factor: ArrayView1<Complex<T>>,
) {
    if lines.nrows() < 2 {
        return;
    }
    for mut row in lines.slice_mut(s![1..;2, ..]).rows_mut() {
        Zip::from(&mut row)
            .and(&factor)
            .for_each(|v, &f| *v = *v * f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    #[test]
    fn test_odd_lines_only() {
        let mut data = Array2::from_shape_fn((5, 3), |(l, w)| Complex::new((l * 3 + w) as f64, 1.0));
        let before = data.clone();
        let factor = Array1::from_elem(3, Complex::new(0.0, 1.0));

        apply_to_odd_lines(data.view_mut(), factor.view());

        for l in 0..5 {
            for w in 0..3 {
                if l % 2 == 0 {
                    assert_eq!(data[(l, w)], before[(l, w)]);
                } else {
                    // 乘以 i.
                    let b = before[(l, w)];
                    assert_eq!(data[(l, w)], Complex::new(-b.im, b.re));
                }
            }
        }
    }

    #[test]
    fn test_without_odd_lines() {
        let factor = Array1::from_elem(3, Complex::new(0.0, 1.0));

        let mut empty = Array2::<Complex<f64>>::zeros((0, 3));
        apply_to_odd_lines(empty.view_mut(), factor.view());
        assert_eq!(empty.dim(), (0, 3));

        let mut one = Array2::from_elem((1, 3), Complex::new(2.0, 0.0));
        apply_to_odd_lines(one.view_mut(), factor.view());
        assert!(one.iter().all(|&c| c == Complex::new(2.0, 0.0)));
    }
}
