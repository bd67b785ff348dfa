//! 程序运行函数.

use crate::result::AblationResult;
use crate::sweeps::{self, Profile};
use std::thread;
use utils::loader;

/// 实际运行.
pub fn run() -> AblationResult {
    println!("Running ablation studies...");
    let mut result = thread::scope(|s| {
        let handles = [
            sweeps::default_f64 as fn() -> Profile,
            sweeps::default_f32,
            sweeps::strict_threshold,
            sweeps::silent_navigators,
        ]
        .map(|t| s.spawn(t));

        AblationResult::from_iter(
            ["default-f64", "default-f32", "strict-threshold", "silent-navigators"]
                .into_iter()
                .zip(
                    handles
                        .into_iter()
                        .map(|th| th.join().expect("Thread joining error")),
                ),
        )
    });

    match loader::archive_from_env_or_home() {
        Some(archive) => result.push("archive", sweeps::archive(&archive)),
        None => log::info!(
            "no acquisition archive at {}, skipped",
            loader::archive_path_from_env_or_home().display()
        ),
    }
    result
}
