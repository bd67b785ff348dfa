use ndarray::{Array3, Ix3, OwnedRepr};
use ndarray_npy::{
    NpzReader, NpzWriter, ReadNpzError, ReadableElement, WritableElement, WriteNpzError,
};
use num::Complex;
use std::fs::{File, OpenOptions};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{KSpace, NavigatorSet, Real};

/// 打开 `AcquisitionArchive` 错误.
#[derive(Debug)]
pub enum OpenArchiveError {
    /// workers 太大. 最多支持 64.
    TooManyWorkers(u32),

    /// 打开 npz 文件错误.
    ReadNpzError(ReadNpzError),

    /// 其他底层 I/O 错误.
    IoError(std::io::Error),
}

/// 写入 `AcquisitionArchive` 错误.
#[derive(Debug)]
pub enum WriteArchiveError {
    /// 创建文件错误.
    IoError(std::io::Error),

    /// 写入 npz 内容错误.
    WriteNpzError(WriteNpzError),
}

/// 一个切片在采集中的位置: 第几次重复, 第几个层面.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SliceKey {
    /// 重复 (repetition) 索引.
    pub repetition: u32,

    /// 层面 (slice) 索引.
    pub slice: u32,
}

impl SliceKey {
    /// 构建切片索引.
    #[inline]
    pub const fn new(repetition: u32, slice: u32) -> Self {
        Self { repetition, slice }
    }

    /// 归档中 k-space 数组的文件名.
    #[inline]
    pub fn kspace_name(&self) -> String {
        format!("kspace_r{}_s{}", self.repetition, self.slice)
    }

    /// 归档中导航回波数组的文件名.
    #[inline]
    pub fn navigator_name(&self) -> String {
        format!("nav_r{}_s{}", self.repetition, self.slice)
    }

    /// 从 k-space 数组文件名解析切片索引. 可以带 `.npy` 后缀.
    pub fn from_kspace_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix(".npy").unwrap_or(name);
        let (rep, slc) = name.strip_prefix("kspace_r")?.split_once("_s")?;
        Some(Self::new(rep.parse().ok()?, slc.parse().ok()?))
    }
}

/// 多切片 EPI 采集的 npz 归档.
///
/// 每个切片包含两个数组: `kspace_r{rep}_s{slc}` (`(line, channel, column)`) 和
/// `nav_r{rep}_s{slc}` (`(navigator, channel, column)`). 导航回波的分组和顺序由导出方保证.
pub struct AcquisitionArchive {
    entries: Vec<Mutex<NpzReader<File>>>,
    turn: AtomicUsize,
}

impl AcquisitionArchive {
    /// 初始化.
    ///
    /// `workers` 指定了底层工作通道的个数, 最大为 64. 系统会从路径 `p` 打开文件
    /// `workers` 次, 并为每个打开通道指定一个排他入口点 (以期获得更高的并行度).
    pub fn new<P: AsRef<Path>>(workers: NonZeroUsize, p: P) -> Result<Self, OpenArchiveError> {
        let workers = workers.get();
        if workers > 64 {
            return Err(OpenArchiveError::TooManyWorkers(64));
        }
        let mut v = Vec::with_capacity(workers);
        for _ in 0..workers {
            let file = OpenOptions::new()
                .read(true)
                .open(p.as_ref())
                .map_err(OpenArchiveError::IoError)?;
            v.push(Mutex::new(
                NpzReader::new(file).map_err(OpenArchiveError::ReadNpzError)?,
            ));
        }
        Ok(Self {
            entries: v,
            turn: AtomicUsize::new(0),
        })
    }

    /// 将若干切片写入 `p` 处的新 npz 归档. 若文件存在, 则覆盖之.
    pub fn write<'a, T, P, I>(p: P, slices: I) -> Result<(), WriteArchiveError>
    where
        T: Real,
        Complex<T>: WritableElement,
        P: AsRef<Path>,
        I: IntoIterator<Item = (SliceKey, &'a KSpace<T>, &'a NavigatorSet<T>)>,
    {
        let file = File::create(p.as_ref()).map_err(WriteArchiveError::IoError)?;
        let mut npz = NpzWriter::new(file);
        for (key, kspace, navigators) in slices {
            npz.add_array(key.kspace_name(), &kspace.data())
                .map_err(WriteArchiveError::WriteNpzError)?;
            npz.add_array(key.navigator_name(), &navigators.data())
                .map_err(WriteArchiveError::WriteNpzError)?;
        }
        npz.finish().map_err(WriteArchiveError::WriteNpzError)?;
        Ok(())
    }

    /// 读取 `key` 对应切片的 k-space.
    pub fn kspace<T: Real>(&self, key: SliceKey) -> Result<KSpace<T>, ReadNpzError>
    where
        Complex<T>: ReadableElement,
    {
        self.array(&key.kspace_name()).map(KSpace::new)
    }

    /// 读取 `key` 对应切片的导航回波组.
    pub fn navigators<T: Real>(&self, key: SliceKey) -> Result<NavigatorSet<T>, ReadNpzError>
    where
        Complex<T>: ReadableElement,
    {
        self.array(&key.navigator_name()).map(NavigatorSet::new)
    }

    /// 按 `(重复, 层面)` 升序获取归档中所有切片的索引.
    pub fn keys(&self) -> Result<Vec<SliceKey>, ReadNpzError> {
        let mut keys: Vec<SliceKey> = self
            .lock_next()
            .names()?
            .iter()
            .filter_map(|n| SliceKey::from_kspace_name(n))
            .collect();
        keys.sort_unstable();
        Ok(keys)
    }

    /// 工作通道个数.
    #[inline]
    pub fn worker_len(&self) -> usize {
        self.entries.len()
    }

    fn array<T: Real>(&self, name: &str) -> Result<Array3<Complex<T>>, ReadNpzError>
    where
        Complex<T>: ReadableElement,
    {
        self.lock_next()
            .by_name::<OwnedRepr<Complex<T>>, Ix3>(name)
    }

    fn lock_next(&self) -> MutexGuard<'_, NpzReader<File>> {
        let slot = self.turn.fetch_add(1, Ordering::Relaxed) % self.worker_len();
        // 读取器本身没有需要保护的不变量, 被毒化后仍可继续使用.
        self.entries[slot]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
