//! H.264 encode profiles shared by the subtitle and logo renders.

use crate::command::FfmpegCommand;

/// Quality settings chosen from the source resolution.
///
/// HD sources get a slower preset and a higher bitrate ceiling; everything
/// else is compressed harder for faster turnaround.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeProfile {
    Hd,
    Sd,
}

impl EncodeProfile {
    pub fn for_hd(is_hd: bool) -> Self {
        if is_hd {
            EncodeProfile::Hd
        } else {
            EncodeProfile::Sd
        }
    }

    pub fn crf(&self) -> u8 {
        match self {
            EncodeProfile::Hd => 23,
            EncodeProfile::Sd => 26,
        }
    }

    pub fn preset(&self) -> &'static str {
        match self {
            EncodeProfile::Hd => "medium",
            EncodeProfile::Sd => "faster",
        }
    }

    pub fn tune(&self) -> &'static str {
        match self {
            EncodeProfile::Hd => "film",
            EncodeProfile::Sd => "fastdecode",
        }
    }

    pub fn maxrate(&self) -> &'static str {
        match self {
            EncodeProfile::Hd => "2M",
            EncodeProfile::Sd => "1M",
        }
    }
}

/// Threads to hand ffmpeg: half the cores, clamped to 2..=4.
pub fn encode_threads(logical_cores: usize) -> usize {
    (logical_cores / 2).clamp(2, 4)
}

/// Apply the full quality-tuned output arguments to a command.
pub fn apply_profile(cmd: FfmpegCommand, profile: EncodeProfile, threads: usize) -> FfmpegCommand {
    cmd.video_codec("libx264")
        .preset(profile.preset())
        .output_arg("-tune")
        .output_arg(profile.tune())
        .crf(profile.crf())
        .output_arg("-maxrate")
        .output_arg(profile.maxrate())
        .output_arg("-bufsize")
        .output_arg("2M")
        .output_arg("-profile:v")
        .output_arg("main")
        .output_arg("-level")
        .output_arg("4.0")
        .output_arg("-pix_fmt")
        .output_arg("yuv420p")
        .output_arg("-movflags")
        .output_arg("+faststart")
        .audio_codec("aac")
        .audio_bitrate("128k")
        .output_arg("-ac")
        .output_arg("2")
        .output_arg("-threads")
        .output_arg(threads.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_values() {
        assert_eq!(EncodeProfile::Hd.crf(), 23);
        assert_eq!(EncodeProfile::Hd.preset(), "medium");
        assert_eq!(EncodeProfile::Hd.maxrate(), "2M");
        assert_eq!(EncodeProfile::Sd.crf(), 26);
        assert_eq!(EncodeProfile::Sd.tune(), "fastdecode");
    }

    #[test]
    fn test_encode_threads_clamped() {
        assert_eq!(encode_threads(1), 2);
        assert_eq!(encode_threads(4), 2);
        assert_eq!(encode_threads(8), 4);
        assert_eq!(encode_threads(32), 4);
    }

    #[test]
    fn test_apply_profile_args() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4");
        let cmd = apply_profile(cmd, EncodeProfile::Hd, 4);
        let args = cmd.build_args();
        assert!(args.contains(&"-tune".to_string()));
        assert!(args.contains(&"film".to_string()));
        assert!(args.contains(&"yuv420p".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }
}
