//! 曲线拟合.
//!
//! 给定一系列点 `(x, y)`, 该模块可以基于最小二乘法拟合出多项式曲线.

use nalgebra::RealField;
use ndarray::ArrayView1;

mod polynomial;

pub use polynomial::Polynomial;

/// 基于最小二乘法拟合 n 次多项式曲线.
///
/// `x` 是自变量数组, `y` 是对应函数值, `degree` 是多项式次数 (最小为 1).
///
/// 以下情况返回 `None`:
///
/// - `x` 与 `y` 长度不一致, 或数据点个数不多于 `degree`;
/// - Vandermonde 矩阵秩亏 (例如自变量的互异值个数不足);
/// - 拟合结果包含非有限值.
pub fn polynomial<'a, T: RealField + Copy>(
    x: ArrayView1<'a, T>,
    y: ArrayView1<'a, T>,
    degree: u32,
) -> Option<Polynomial<T>> {
    polynomial::PolyImp::<T>::new(x, y, degree)?.fit()
}
