//! 对 `epi_berry::dataset` 的更一层封装. 提供更直接的采集归档加载器.

use epi_berry::dataset::{self, AcquisitionArchive, OpenArchiveError};
use std::env;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// 获取 EPI 采集归档路径.
///
/// 1. 若环境变量 `$EPI_GHOST_DIR` 非空, 则返回 `$EPI_GHOST_DIR/acquisition.npz`;
/// 2. 否则, 返回 `$HOME/dataset/epi/acquisition.npz`.
pub fn archive_path_from_env_or_home() -> PathBuf {
    match env::var("EPI_GHOST_DIR") {
        Ok(d) if !d.is_empty() => PathBuf::from(d).join("acquisition.npz"),
        _ => dataset::home_dataset_dir_with(["acquisition.npz"]).unwrap(),
    }
}

/// 以 `crate::cpus()` 个工作通道打开 `path` 处的采集归档.
pub fn archive<P: AsRef<Path>>(path: P) -> Result<AcquisitionArchive, OpenArchiveError> {
    let workers = NonZeroUsize::new(crate::cpus().min(64)).unwrap_or(NonZeroUsize::MIN);
    AcquisitionArchive::new(workers, path)
}

/// 从 `$EPI_GHOST_DIR` 或者 `$HOME/dataset/epi` 下打开采集归档. 文件不存在时返回 `None`.
pub fn archive_from_env_or_home() -> Option<AcquisitionArchive> {
    let p = archive_path_from_env_or_home();
    if !p.is_file() {
        return None;
    }
    archive(p).ok()
}
