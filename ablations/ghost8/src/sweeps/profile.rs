//! 校正运行统计.

use epi_berry::prelude::*;
use std::f64::consts::{PI, TAU};
use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::from_secs(0),
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加. 返回本轮计时时长.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) -> Duration {
        let d = self.since.elapsed();
        self.consumed += d;
        d
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 将相位差折回 `[-π, π)`.
#[inline]
fn wrapped(d: f64) -> f64 {
    (d + PI).rem_euclid(TAU) - PI
}

#[inline]
fn max_of(old: Option<f64>, new: f64) -> Option<f64> {
    Some(old.map_or(new, |o| o.max(new)))
}

/// ablation/benchmark 数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 处理的切片个数.
    slices: u64,

    /// 被校正的通道个数.
    corrected: u64,

    /// 因信号不足原样通过的通道个数.
    low_signal: u64,

    /// 因拟合失败原样通过的通道个数.
    fit_failure: u64,

    /// 校正花费的总时间 (不含合成或读取数据).
    correct_time: AccTimer,

    /// 整个任务花费的总时间.
    real_time: AccTimer,

    /// 最耗时的一次校正.
    most: Duration,

    /// 已知真值时, 常数项的最大绝对误差 (模 2π).
    max_alpha_error: Option<f64>,

    /// 已知真值时, 线性项的最大绝对误差.
    max_beta_error: Option<f64>,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            slices: 0,
            corrected: 0,
            low_signal: 0,
            fit_failure: 0,
            correct_time: AccTimer::default(),
            real_time: AccTimer::default(),
            most: Duration::MAX,
            max_alpha_error: None,
            max_beta_error: None,
        }
    }

    /// 开始一次校正计时.
    #[inline]
    pub fn correct_start(&mut self) {
        self.correct_time.start();
    }

    /// 结束一次校正计时, 并计入一个切片.
    #[inline]
    pub fn correct_elapsed(&mut self) {
        let d = self.correct_time.elapsed();
        self.slices += 1;
        self.most = match self.most {
            Duration::MAX => d,
            once_duration => std::cmp::max(d, once_duration),
        };
    }

    /// 记录一个切片的校正报告. `truth` 为各通道真实的 `(alpha, beta)`, 未知时为 `None`.
    pub fn record(&mut self, report: &GhostReport, truth: Option<&[(f64, f64)]>) {
        for (ch, outcome) in report.outcomes().enumerate() {
            match outcome {
                ChannelOutcome::Corrected { model, .. } => {
                    self.corrected += 1;
                    if let Some(&(alpha, beta)) = truth.and_then(|t| t.get(ch)) {
                        let ea = wrapped(model.alpha - alpha).abs();
                        self.max_alpha_error = max_of(self.max_alpha_error, ea);
                        self.max_beta_error = max_of(self.max_beta_error, (model.beta - beta).abs());
                    }
                }
                ChannelOutcome::PassThrough(PassReason::LowSignal { .. }) => self.low_signal += 1,
                ChannelOutcome::PassThrough(PassReason::FitFailure) => self.fit_failure += 1,
            }
        }
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得总切片个数.
    #[inline]
    pub fn get_slices(&self) -> u64 {
        self.slices
    }

    /// 获得被校正的通道个数.
    #[inline]
    pub fn get_corrected(&self) -> u64 {
        self.corrected
    }

    /// 获得信号不足的通道个数.
    #[inline]
    pub fn get_low_signal(&self) -> u64 {
        self.low_signal
    }

    /// 获得拟合失败的通道个数.
    #[inline]
    pub fn get_fit_failure(&self) -> u64 {
        self.fit_failure
    }

    /// 获得常数项最大误差.
    #[inline]
    pub fn get_max_alpha_error(&self) -> Option<f64> {
        self.max_alpha_error
    }

    /// 获得线性项最大误差.
    #[inline]
    pub fn get_max_beta_error(&self) -> Option<f64> {
        self.max_beta_error
    }

    /// 以微秒为单位获得校正的总花费自然时间.
    #[inline]
    pub fn get_correct_time_us(&self) -> u64 {
        self.correct_time.get_total_us()
    }

    /// 以微秒为单位获得运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以微秒为单位获得每个切片的平均校正时间.
    #[inline]
    pub fn get_avg_correct_time_us(&self) -> Option<f64> {
        match self.slices {
            0 => None,
            slices => Some(self.get_correct_time_us() as f64 / slices as f64),
        }
    }

    /// 获取最耗时的一次校正所消耗的时间.
    ///
    /// 如果不存在任务, 则返回 `None`.
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        match self.most {
            Duration::MAX => None,
            d => Some(d),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
