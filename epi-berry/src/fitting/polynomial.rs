//! 多项式曲线.

// ref: https://blog.csdn.net/u012494154/article/details/112519550

use nalgebra::{DMatrix, DVector, RealField};
use ndarray::{Array1, ArrayView1};

/// 系数按升幂排列的多项式, 即 `c[0] + c[1] x + c[2] x^2 + ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial<T>(Array1<T>);

impl<T> Polynomial<T> {
    /// 升幂系数.
    #[inline]
    pub fn coefficients(&self) -> ArrayView1<'_, T> {
        self.0.view()
    }
}

pub(crate) struct PolyImp<'a, T> {
    x: ArrayView1<'a, T>,
    y: ArrayView1<'a, T>,
    degree: u32,
}

impl<'a, T: RealField + Copy> PolyImp<'a, T> {
    /// `degree` 是多项式次数.
    ///
    /// 以下情况无法拟合, 返回 `None`:
    ///
    /// 1. x 值和 y 值个数不一致;
    /// 2. 次数为 0;
    /// 3. 数据点个数不多于次数.
    pub fn new(x: ArrayView1<'a, T>, y: ArrayView1<'a, T>, degree: u32) -> Option<Self> {
        if x.len() != y.len() || degree == 0 || x.len() <= degree as usize {
            return None;
        }
        Some(Self { x, y, degree })
    }

    /// 对 Vandermonde 矩阵做 SVD, 求 `V θ = y` 的最小二乘解.
    ///
    /// 若矩阵秩亏 (如自变量互异值不足) 或结果非有限值, 返回 `None`.
    pub fn fit(&self) -> Option<Polynomial<T>> {
        let n = self.degree as usize + 1;
        let v_mat = self.vandermonde();
        let y = DVector::from_iterator(self.y.len(), self.y.iter().copied());

        let svd = v_mat.svd(true, true);
        let largest = svd
            .singular_values
            .iter()
            .copied()
            .fold(T::zero(), |acc, v| acc.max(v));
        let eps = largest * nalgebra::convert::<f64, T>(self.x.len() as f64) * T::default_epsilon();
        if svd.rank(eps) < n {
            return None;
        }

        let theta = svd.solve(&y, eps).ok()?;
        if theta.iter().all(|v| v.is_finite()) {
            Some(Polynomial(theta.iter().copied().collect()))
        } else {
            None
        }
    }

    fn vandermonde(&self) -> DMatrix<T> {
        // shape: (m, n); m = x.len(), n = self.degree + 1
        DMatrix::from_fn(self.x.len(), self.degree as usize + 1, |m, n| {
            self.x[m].powi(n as i32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn f64_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_exact_line() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = x.mapv(|v: f64| 0.3 - 0.05 * v);
        let p = PolyImp::new(x.view(), y.view(), 1).unwrap().fit().unwrap();
        assert!(f64_eq(p.coefficients()[0], 0.3));
        assert!(f64_eq(p.coefficients()[1], -0.05));
    }

    #[test]
    fn test_least_squares_line() {
        // x 均值 1.5, Sxy = 4.8, Sxx = 5.
        let x = array![0.0f32, 1.0, 2.0, 3.0];
        let y = array![0.1f32, 0.9, 2.1, 2.9];
        let p = PolyImp::new(x.view(), y.view(), 1).unwrap().fit().unwrap();
        assert!((p.coefficients()[0] - 0.06).abs() < 1e-4);
        assert!((p.coefficients()[1] - 0.96).abs() < 1e-4);
    }

    #[test]
    fn test_quadratic() {
        let x = array![-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let y = x.mapv(|v: f64| 1.0 - v + 0.5 * v * v);
        let p = PolyImp::new(x.view(), y.view(), 2).unwrap().fit().unwrap();
        for (c, e) in p.coefficients().iter().zip([1.0, -1.0, 0.5]) {
            assert!(f64_eq(*c, e));
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let x = array![1.0, 2.0];
        let y = array![1.0];
        assert!(PolyImp::new(x.view(), y.view(), 1).is_none());

        let y = array![1.0, 2.0];
        assert!(PolyImp::new(x.view(), y.view(), 0).is_none());
        assert!(PolyImp::new(x.view(), y.view(), 2).is_none());

        // 自变量只有一个互异值.
        let x = array![3.0, 3.0, 3.0];
        let y = array![1.0, 2.0, 3.0];
        assert!(PolyImp::new(x.view(), y.view(), 1).unwrap().fit().is_none());

        // 非有限值.
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, f64::NAN, 1.0];
        assert!(PolyImp::new(x.view(), y.view(), 1).unwrap().fit().is_none());
    }
}
