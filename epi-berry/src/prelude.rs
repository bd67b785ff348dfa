//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::data::polarity::{flip_navigator, flip_odd_lines, normalize_polarity};
pub use crate::data::{Complex32, Complex64, KSpace, NavigatorSet, Real};

pub use crate::consts::navigator::NAVIGATOR_COUNT;
pub use crate::consts::{DEFAULT_MIN_VALID_COLUMNS, DEFAULT_THRESHOLD_RATIO};

pub use crate::error::{ConfigError, ConfigResult};

pub use crate::ghost::{
    correct, ChannelOutcome, Corrected, GhostConfig, GhostCorrector, GhostReport,
    NavigatorLayout, PassReason, PhaseModel, PhaseProfile,
};

pub use crate::dataset::{AcquisitionArchive, SliceKey};
