use std::fmt::Debug;
use std::ops::Index;

use ndarray::{s, Array3, ArrayView2, ArrayView3, Axis};
use num::{Complex, Float};

use crate::consts::navigator::NAVIGATOR_COUNT;
use crate::{Idx2d, Idx3d};

mod npy;
pub mod polarity;

pub use npy::NpyIoError;

/// k-space 采样点的实数精度. 目前仅有 `f32` (complex64) 和 `f64` (complex128).
///
/// 校正全程保持输入精度不变; 相位拟合在内部统一以 `f64` 进行.
pub trait Real: Float + Default + Debug + Send + Sync + 'static {
    /// 无损扩展为 `f64`.
    fn widen(self) -> f64;

    /// 从 `f64` 收窄为当前精度.
    fn narrow(v: f64) -> Self;
}

macro_rules! impl_real {
    ($fp: ty) => {
        impl Real for $fp {
            #[inline]
            fn widen(self) -> f64 {
                self as f64
            }

            #[inline]
            fn narrow(v: f64) -> Self {
                v as $fp
            }
        }
    };
}

impl_real!(f32);
impl_real!(f64);

/// 单精度复数 k-space 采样.
pub type Complex32 = Complex<f32>;

/// 双精度复数 k-space 采样.
pub type Complex64 = Complex<f64>;

/// 一个切片 (slice) 的多通道 k-space 数据, 以 `(line, channel, column)` 索引.
///
/// - `line` 为相位编码步, 偶数行和奇数行的读出极性相反;
/// - `channel` 为接收线圈通道;
/// - `column` 为读出方向的采样点.
///
/// 该结构是只读的值类型. 所有变换都返回新的实例.
#[derive(Debug, Clone, PartialEq)]
pub struct KSpace<T: Real> {
    data: Array3<Complex<T>>,
}

impl<T: Real> From<Array3<Complex<T>>> for KSpace<T> {
    #[inline]
    fn from(data: Array3<Complex<T>>) -> Self {
        Self { data }
    }
}

impl<T: Real> Index<Idx3d> for KSpace<T> {
    type Output = Complex<T>;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl<T: Real> KSpace<T> {
    /// 以 `(line, channel, column)` 布局的数组构建 k-space.
    #[inline]
    pub fn new(data: Array3<Complex<T>>) -> Self {
        Self { data }
    }

    /// 以全零数据构建形状为 `(n_lines, n_channels, n_columns)` 的 k-space.
    #[inline]
    pub fn zeros(shape: Idx3d) -> Self {
        Self::new(Array3::zeros(shape))
    }

    /// 获取数据形状 `(n_lines, n_channels, n_columns)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 相位编码行数.
    #[inline]
    pub fn n_lines(&self) -> usize {
        self.shape().0
    }

    /// 接收通道数.
    #[inline]
    pub fn n_channels(&self) -> usize {
        self.shape().1
    }

    /// 读出方向采样点数.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.shape().2
    }

    /// 单行 (所有通道) 的形状 `(n_channels, n_columns)`.
    #[inline]
    pub fn line_shape(&self) -> Idx2d {
        let (_, c, w) = self.shape();
        (c, w)
    }

    /// 底层数据的只读视图.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, Complex<T>> {
        self.data.view()
    }

    /// 消费自我, 获得底层数组.
    #[inline]
    pub fn into_inner(self) -> Array3<Complex<T>> {
        self.data
    }

    /// 第 `line` 行 (所有通道) 的 `(channel, column)` 视图.
    ///
    /// 当 `line` 越界时 panic.
    #[inline]
    pub fn line(&self, line: usize) -> ArrayView2<'_, Complex<T>> {
        self.data.index_axis(Axis(0), line)
    }

    /// 第 `channel` 个通道 (所有行) 的 `(line, column)` 视图.
    ///
    /// 当 `channel` 越界时 panic.
    #[inline]
    pub fn channel(&self, channel: usize) -> ArrayView2<'_, Complex<T>> {
        self.data.index_axis(Axis(1), channel)
    }

    pub(crate) fn data_mut(&mut self) -> &mut Array3<Complex<T>> {
        &mut self.data
    }
}

/// 导航回波组, 以 `(navigator, channel, column)` 索引.
///
/// 采集顺序约定 (由调用方保证):
///
/// 1. 索引 0: 正极性, 与偶数行相同;
/// 2. 索引 1: 负极性, 与奇数行相同;
/// 3. 索引 2: 正极性, 与偶数行相同.
///
/// 可以包含多于三条导航回波, 但校正仅消费前三条.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorSet<T: Real> {
    data: Array3<Complex<T>>,
}

impl<T: Real> From<Array3<Complex<T>>> for NavigatorSet<T> {
    #[inline]
    fn from(data: Array3<Complex<T>>) -> Self {
        Self { data }
    }
}

impl<T: Real> NavigatorSet<T> {
    /// 以 `(navigator, channel, column)` 布局的数组构建导航回波组.
    #[inline]
    pub fn new(data: Array3<Complex<T>>) -> Self {
        Self { data }
    }

    /// 导航回波条数.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// 是否不含任何导航回波.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 单条导航回波的形状 `(n_channels, n_columns)`.
    #[inline]
    pub fn line_shape(&self) -> Idx2d {
        let (_, c, w) = self.data.dim();
        (c, w)
    }

    /// 第 `index` 条导航回波的 `(channel, column)` 视图.
    ///
    /// 当 `index` 越界时 panic.
    #[inline]
    pub fn navigator(&self, index: usize) -> ArrayView2<'_, Complex<T>> {
        self.data.index_axis(Axis(0), index)
    }

    /// 底层数据的只读视图.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, Complex<T>> {
        self.data.view()
    }

    /// 消费自我, 获得底层数组.
    #[inline]
    pub fn into_inner(self) -> Array3<Complex<T>> {
        self.data
    }

    /// 多于被消费条数的导航回波个数.
    #[inline]
    pub fn surplus(&self) -> usize {
        self.len().saturating_sub(NAVIGATOR_COUNT)
    }

    /// 复制前 `NAVIGATOR_COUNT` 条导航回波. 调用方需保证条数足够.
    pub(crate) fn leading(&self) -> Self {
        debug_assert!(self.len() >= NAVIGATOR_COUNT);
        Self::new(self.data.slice(s![..NAVIGATOR_COUNT, .., ..]).to_owned())
    }

    pub(crate) fn data_mut(&mut self) -> &mut Array3<Complex<T>> {
        &mut self.data
    }
}
