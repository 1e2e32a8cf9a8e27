use std::collections::HashSet;
use std::fmt::Write;

use chrono::NaiveDate;

/// Extension given to every uploaded photo.
pub const FILE_EXTENSION: &str = "png";

/// Where a single photo ends up on the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub remote_folder: String,
    pub file_name: String,
}

impl UploadTarget {
    /// `folder/file` as Yandex Disk expects it in the `path` parameter.
    pub fn remote_path(&self) -> String {
        format!("{}/{}", self.remote_folder, self.file_name)
    }
}

/// Hands out file names for one batch, remembering every name it produced.
///
/// The first photo with a given likes count gets `<likes>.png`. Later ones
/// get the capture date appended as `<likes>_DD-MM-YYYY.png`; if even that is
/// taken (same likes, same day) a counter follows the date.
#[derive(Debug, Default)]
pub struct FileNamer {
    seen: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_for(&mut self, likes_count: u64, captured_on: NaiveDate) -> String {
        let base = format!("{likes_count}.{FILE_EXTENSION}");
        if self.seen.insert(base.clone()) {
            return base;
        }

        let stem = format!("{likes_count}_{}", captured_on.format("%d-%m-%Y"));
        let mut candidate = format!("{stem}.{FILE_EXTENSION}");
        let mut counter = 2u32;
        while !self.seen.insert(candidate.clone()) {
            candidate.clear();
            let _ = write!(candidate, "{stem}_{counter}.{FILE_EXTENSION}");
            counter += 1;
        }
        candidate
    }
}
