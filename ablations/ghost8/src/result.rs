//! 实验结果.

use crate::sweeps::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn e_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.3e}"),
            None => "/".to_string(),
        }
    }

    #[inline]
    fn u64_to_display(u: Option<u64>) -> String {
        match u {
            Some(u) => u.to_string(),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Slices: {}", p.get_slices())?;
    writeln!(w, "{S4}Corrected channels: {}", p.get_corrected())?;
    writeln!(w, "{S4}Low-signal channels: {}", p.get_low_signal())?;
    writeln!(w, "{S4}Fit failures: {}", p.get_fit_failure())?;
    writeln!(w, "{S4}Max alpha error: {} rad", e_to_display(p.get_max_alpha_error()))?;
    writeln!(w, "{S4}Max beta error: {} rad/column", e_to_display(p.get_max_beta_error()))?;
    writeln!(w, "{S4}Correction total time: {} us", p.get_correct_time_us())?;
    writeln!(
        w,
        "{S4}Correction average time: {} us",
        f64_to_display(p.get_avg_correct_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as u64);
    write!(w, "{S4}Most time-consuming slice costs {} us", u64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(&'static str, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (&'static str, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 追加一组结果.
    pub fn push(&mut self, name: &'static str, profile: Profile) {
        self.data.push((name, profile));
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (key, profile) in self.data.iter() {
            describe_into(key, profile, &mut buf).unwrap();
            println!("{}", std::str::from_utf8(&buf).unwrap());
            buf.clear();

            utils::sep();
        }
    }
}
