mod profile;

use epi_berry::prelude::*;
use log::{info, warn};
use utils::synthetic::Phantom;

pub use profile::Profile;

/// 常数项取值. 均落在 `(-π, π)` 内.
const ALPHAS: [f64; 7] = [-3.0, -1.5, -0.3, 0.0, 0.4, 1.7, 3.0];

/// 线性项取值, 每个取值对应一个通道.
const BETAS: [f64; 6] = [-0.08, -0.02, 0.0, 0.01, 0.05, 0.12];

/// 每个常数项生成一个切片, 各通道的线性项取遍 `BETAS`.
fn phantoms() -> impl Iterator<Item = Phantom> {
    ALPHAS
        .into_iter()
        .map(|alpha| Phantom::new(BETAS.iter().map(|&beta| (alpha, beta)).collect()))
}

fn run_phantoms<T: Real, I>(name: &str, corrector: GhostCorrector, it: I) -> Profile
where
    I: IntoIterator<Item = Phantom>,
{
    let mut profile = Profile::new();
    for (idx, phantom) in it.into_iter().enumerate() {
        info!("{name}: phantom {idx}...");
        let (kspace, navs) = phantom.acquire::<T>();

        profile.correct_start();
        let out = corrector.correct(&kspace, &navs);
        profile.correct_elapsed();

        match out {
            Ok(c) => profile.record(&c.report, Some(phantom.phases.as_slice())),
            Err(e) => warn!("{name}: phantom {idx} rejected: {e}"),
        }
    }
    profile.finish()
}

pub fn default_f64() -> Profile {
    run_phantoms::<f64, _>("default-f64", GhostCorrector::default(), phantoms())
}

pub fn default_f32() -> Profile {
    run_phantoms::<f32, _>("default-f32", GhostCorrector::default(), phantoms())
}

/// 门限提高到峰值的一半, 有效列更少.
pub fn strict_threshold() -> Profile {
    let config = GhostConfig::default()
        .with_threshold_ratio(0.5)
        .expect("Threshold config error");
    run_phantoms::<f64, _>("strict-threshold", GhostCorrector::new(config), phantoms())
}

/// 导航回波全为零, 所有通道都应原样通过.
pub fn silent_navigators() -> Profile {
    let it = phantoms().map(|mut p| {
        p.navigator_gain = 0.0;
        p
    });
    run_phantoms::<f64, _>("silent-navigators", GhostCorrector::default(), it)
}

/// 校正真实采集归档中的全部切片. 真值未知, 只统计通道结果与耗时.
pub fn archive(archive: &AcquisitionArchive) -> Profile {
    let mut profile = Profile::new();
    let corrector = GhostCorrector::default();
    let keys = match archive.keys() {
        Ok(keys) => keys,
        Err(e) => {
            warn!("archive: cannot list slices: {e}");
            return profile.finish();
        }
    };

    for key in keys {
        let (kspace, navs) = match (archive.kspace::<f32>(key), archive.navigators::<f32>(key)) {
            (Ok(k), Ok(n)) => (k, n),
            (Err(e), _) | (_, Err(e)) => {
                warn!("archive: slice {key:?} unreadable: {e}");
                continue;
            }
        };
        info!("archive: slice {key:?}...");

        profile.correct_start();
        let out = corrector.correct(&kspace, &navs);
        profile.correct_elapsed();

        match out {
            Ok(c) => profile.record(&c.report, None),
            Err(e) => warn!("archive: slice {key:?} rejected: {e}"),
        }
    }
    profile.finish()
}
