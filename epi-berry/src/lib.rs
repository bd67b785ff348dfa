#![warn(missing_docs)]
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 基于三条导航回波 (navigator / reference line) 校正 EPI k-space 的
//! Nyquist (N/2) 伪影.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 该 crate 只负责校正变换本身. 原始测量数据读取、二维傅里叶重建、多通道合成、
//!   可视化均由外部完成. `.npy` 读写仅作为与外部工具交换数据的边界.
//! 2. 相位模型只包含常数项和线性项, 不处理更高阶的非线性相位误差.
//! 3. 输入数组不会被修改, 所有变换都返回新的值.
//!
//! # 开发计划
//!
//! ### 读出极性归一化 ✅
//!
//! 奇数行和负极性导航回波沿读出方向翻转.
//!
//! 实现位于 `epi-berry/src/data/polarity.rs`.
//!
//! ### 最小二乘多项式拟合的纯 Rust 实现 ✅
//!
//! 基于 `nalgebra` 的 SVD 求解 Vandermonde 方程组, 秩亏时返回 `None` 而不是 panic.
//!
//! 实现位于 `epi-berry/src/fitting`.
//!
//! ### 逐通道相位估计与校正 ✅
//!
//! 1. 幅值掩模, 排除成像物体以外的噪声列; ✅
//! 2. `arg(pos * conj(neg))` 相位差与一维解卷绕; ✅
//! 3. 一次模型拟合, 并外推到全部列; ✅
//! 4. 只校正奇数行, 偶数行作为相位参考. ✅
//!
//! 实现位于 `epi-berry/src/ghost`.
//!
//! ### 逐通道校正报告 ✅
//!
//! 信号不足或拟合失败的通道原样通过, 并在 [`ghost::GhostReport`] 中明确标出.
//!
//! ### 多导航回波的利用 ⌛️
//!
//! 多于三条导航回波时, 目前只使用前三条. 是否应该拒绝或平均多余的导航回波尚无定论.
//!
//! ### npz 采集归档 ✅
//!
//! 按 `(重复, 层面)` 存放的多切片采集, 支持多线程并行读取.
//!
//! 实现位于 `epi-berry/src/dataset`.

/// 二维索引, 同时也用作 `(通道, 列)` 等形状.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也用作 `(行, 通道, 列)` 等形状.
pub type Idx3d = (usize, usize, usize);

/// k-space 与导航回波基础数据结构.
mod data;

pub use data::{polarity, Complex32, Complex64, KSpace, NavigatorSet, NpyIoError, Real};

pub mod consts;

pub mod dataset;

pub mod error;

pub mod fitting;

pub mod ghost;

pub mod prelude;

pub use error::{ConfigError, ConfigResult};
pub use ghost::{correct, Corrected, GhostConfig, GhostCorrector, GhostReport};
