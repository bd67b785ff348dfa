//! `.npy` 文件边界. 外部读取器导出的 complex64/complex128 数组可由此载入.

use std::path::Path;

use ndarray::Array3;
use ndarray_npy::{ReadNpyError, ReadableElement, WritableElement, WriteNpyError};
use num::Complex;

use super::{KSpace, NavigatorSet, Real};

/// 读写 `.npy` 文件错误.
#[derive(Debug)]
pub enum NpyIoError {
    /// 读取 npy 文件错误 (包括底层 I/O 错误, 元素类型或维数不符).
    Read(ReadNpyError),

    /// 写入 npy 文件错误.
    Write(WriteNpyError),
}

impl From<ReadNpyError> for NpyIoError {
    #[inline]
    fn from(e: ReadNpyError) -> Self {
        Self::Read(e)
    }
}

impl From<WriteNpyError> for NpyIoError {
    #[inline]
    fn from(e: WriteNpyError) -> Self {
        Self::Write(e)
    }
}

impl std::fmt::Display for NpyIoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "reading npy failed: {e}"),
            Self::Write(e) => write!(f, "writing npy failed: {e}"),
        }
    }
}

impl std::error::Error for NpyIoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(e) => Some(e),
            Self::Write(e) => Some(e),
        }
    }
}

impl<T: Real> KSpace<T>
where
    Complex<T>: ReadableElement + WritableElement,
{
    /// 从 `path` 读取 `(line, channel, column)` 布局的 3 维复数 npy 数组.
    pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<Self, NpyIoError> {
        let data: Array3<Complex<T>> = ndarray_npy::read_npy(path.as_ref())?;
        Ok(Self::new(data))
    }

    /// 以 npy 格式将数据写入 `path`. 若文件存在, 则覆盖之.
    pub fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), NpyIoError> {
        ndarray_npy::write_npy(path.as_ref(), &self.data)?;
        Ok(())
    }
}

impl<T: Real> NavigatorSet<T>
where
    Complex<T>: ReadableElement + WritableElement,
{
    /// 从 `path` 读取 `(navigator, channel, column)` 布局的 3 维复数 npy 数组.
    pub fn read_npy<P: AsRef<Path>>(path: P) -> Result<Self, NpyIoError> {
        let data: Array3<Complex<T>> = ndarray_npy::read_npy(path.as_ref())?;
        Ok(Self::new(data))
    }

    /// 以 npy 格式将数据写入 `path`. 若文件存在, 则覆盖之.
    pub fn write_npy<P: AsRef<Path>>(&self, path: P) -> Result<(), NpyIoError> {
        ndarray_npy::write_npy(path.as_ref(), &self.data)?;
        Ok(())
    }
}
