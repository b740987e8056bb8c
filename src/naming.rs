use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Prefix shared by every persisted result file.
pub const FILE_PREFIX: &str = "xubit_m";

/// `strftime` layout for the time part of a file name, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Source of "now" for file naming.
///
/// The server uses [`SystemClock`]; tests pin an instant with [`FixedClock`]
/// so derived names are reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock in the process's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// `xubit_m{m}_{YYYY-MM-DD_HH-MM-SS}.json`
///
/// `m` is used as decoded, so zero and negative values show up verbatim.
pub fn file_name(m: i64, at: &DateTime<Local>) -> String {
    format!("{}{}_{}.json", FILE_PREFIX, m, at.format(TIMESTAMP_FORMAT))
}

/// Full path of the result file for `m` at `at` inside `dir`.
pub fn result_path(dir: &Path, m: i64, at: &DateTime<Local>) -> PathBuf {
    dir.join(file_name(m, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 2)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(file_name(5, &instant()), "xubit_m5_2024-03-07_09-05-02.json");
    }

    #[test]
    fn test_file_name_passes_m_through() {
        assert_eq!(file_name(0, &instant()), "xubit_m0_2024-03-07_09-05-02.json");
        assert_eq!(
            file_name(-12, &instant()),
            "xubit_m-12_2024-03-07_09-05-02.json"
        );
    }

    #[test]
    fn test_result_path_joins_dir() {
        let path = result_path(Path::new("results"), 3, &instant());
        assert_eq!(
            path,
            Path::new("results").join("xubit_m3_2024-03-07_09-05-02.json")
        );
    }

    #[test]
    fn test_fixed_clock_is_deterministic() {
        let clock = FixedClock(instant());
        assert_eq!(file_name(7, &clock.now()), file_name(7, &clock.now()));
    }
}
