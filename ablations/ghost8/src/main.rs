//! Nyquist 伪影校正消融实验.
//!
//! 在合成采集上比较不同参数、不同精度下的估计误差与耗时.
//! 若存在真实采集归档 (见 `utils::loader`), 则同时统计其逐通道校正结果.

mod result;
mod runner;
mod sweeps;

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()
        .expect("Logger initialization error");

    runner::run().analyze();
}
