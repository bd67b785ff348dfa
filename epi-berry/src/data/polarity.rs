//! 读出极性归一化.
//!
//! EPI 采集中奇数行以反向读出梯度采样, 其列顺序与偶数行相反.
//! 该模块将奇数行和负极性导航回波沿读出方向翻转, 使所有数据处于同一读出方向.
//!
//! 翻转只改变列顺序, 不改变任何采样值. 对已经归一化的数据再次翻转会将其还原,
//! 因此调用方不应重复调用.

use ndarray::s;

use super::{KSpace, NavigatorSet, Real};

/// 复制 `kspace`, 并将所有奇数行的列顺序翻转. 偶数行保持不变.
///
/// 这也是 "只翻转, 不做相位校正" 重建所用的输入.
pub fn flip_odd_lines<T: Real>(kspace: &KSpace<T>) -> KSpace<T> {
    let mut out = kspace.clone();
    if kspace.n_lines() < 2 {
        return out;
    }
    out.data_mut()
        .slice_mut(s![1..;2, .., ..])
        .assign(&kspace.data().slice(s![1..;2, .., ..;-1]));
    out
}

/// 复制 `navigators`, 并将第 `negative` 条导航回波的列顺序翻转. 其它导航回波保持不变.
///
/// 当 `negative` 越界时 panic.
pub fn flip_navigator<T: Real>(navigators: &NavigatorSet<T>, negative: usize) -> NavigatorSet<T> {
    let mut out = navigators.clone();
    out.data_mut()
        .slice_mut(s![negative, .., ..])
        .assign(&navigators.data().slice(s![negative, .., ..;-1]));
    out
}

/// 同时归一化 k-space 和导航回波组, 依次返回两者的副本.
#[inline]
pub fn normalize_polarity<T: Real>(
    kspace: &KSpace<T>,
    navigators: &NavigatorSet<T>,
    negative: usize,
) -> (KSpace<T>, NavigatorSet<T>) {
    (flip_odd_lines(kspace), flip_navigator(navigators, negative))
}
