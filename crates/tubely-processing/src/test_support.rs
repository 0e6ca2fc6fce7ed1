//! Fake ffprobe/ffmpeg executables for exercising the real process wrappers.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub(crate) struct FakeTools {
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
}

fn write_script(path: &Path, body: &str) {
    std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).unwrap();
}

/// Copies the input (4th argument) to the last argument.
const REMUX_OK: &str = "for last; do :; done\nexec cp \"$4\" \"$last\"";

impl FakeTools {
    /// ffprobe reports one audio stream and one video stream of the given size.
    pub(crate) fn new(dir: &Path, width: u32, height: u32) -> Self {
        let json = format!(
            r#"{{"streams":[{{"codec_type":"audio"}},{{"codec_type":"video","width":{},"height":{}}}]}}"#,
            width, height
        );
        Self::with_scripts(dir, &format!("echo '{}'", json), REMUX_OK)
    }

    pub(crate) fn failing_probe(dir: &Path) -> Self {
        Self::with_scripts(
            dir,
            "echo 'Invalid data found when processing input' >&2\nexit 1",
            REMUX_OK,
        )
    }

    /// ffmpeg writes partial output, then fails.
    pub(crate) fn failing_remux(dir: &Path) -> Self {
        Self::with_scripts(
            dir,
            r#"echo '{"streams":[{"width":1920,"height":1080}]}'"#,
            "for last; do :; done\necho partial > \"$last\"\necho 'moov atom not found' >&2\nexit 1",
        )
    }

    pub(crate) fn with_scripts(dir: &Path, ffprobe_body: &str, ffmpeg_body: &str) -> Self {
        let bin = dir.join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let ffprobe = bin.join("ffprobe");
        let ffmpeg = bin.join("ffmpeg");
        write_script(&ffprobe, ffprobe_body);
        write_script(&ffmpeg, ffmpeg_body);
        Self { ffprobe, ffmpeg }
    }

    pub(crate) fn ffprobe(&self) -> String {
        self.ffprobe.to_string_lossy().into_owned()
    }

    pub(crate) fn ffmpeg(&self) -> String {
        self.ffmpeg.to_string_lossy().into_owned()
    }
}
