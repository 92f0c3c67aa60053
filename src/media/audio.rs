//! 音频批量转 MP3
//!
//! 调用系统 ffmpeg 完成实际转码。目标文件已存在时跳过，
//! ffmpeg 缺失视为致命错误（后续文件必然全部失败）。

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{error, info};

/// 音频转换错误
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// ffmpeg 不存在
    #[error("找不到 ffmpeg，请确认已安装并在 PATH 中: {0}")]
    FfmpegNotFound(std::io::Error),

    /// ffmpeg 执行失败
    #[error("ffmpeg 执行失败 (退出码 {exit_code:?}): {stderr}")]
    ExecutionFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 源音频格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    M4a,
    Wav,
}

impl AudioFormat {
    /// 源文件扩展名（小写）
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::M4a => "m4a",
            AudioFormat::Wav => "wav",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m4a" => Ok(AudioFormat::M4a),
            "wav" => Ok(AudioFormat::Wav),
            other => Err(format!("不支持的音频格式: {}", other)),
        }
    }
}

/// 转换统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct AudioStats {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 计算输出文件路径（扩展名换成 .mp3）
pub fn mp3_path(input: &Path, output_folder: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_folder.join(format!("{}.mp3", stem))
}

/// 单个文件转 MP3
pub async fn convert_file(input: &Path, output: &Path, bitrate: &str) -> Result<(), AudioError> {
    let result = tokio::process::Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args(["-b:a", bitrate])
        .arg(output)
        .output()
        .await;

    let output_result = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AudioError::FfmpegNotFound(e))
        }
        Err(e) => return Err(AudioError::Io(e)),
    };

    if !output_result.status.success() {
        return Err(AudioError::ExecutionFailed {
            exit_code: output_result.status.code(),
            stderr: String::from_utf8_lossy(&output_result.stderr).to_string(),
        });
    }

    Ok(())
}

/// 把文件夹内指定格式的音频全部转成 MP3
///
/// # 参数
/// - `input_folder`: 源文件夹
/// - `output_folder`: 输出文件夹（不存在时创建）
/// - `bitrate`: MP3 比特率（如 "192k"）
/// - `format`: 源音频格式
pub async fn convert_folder(
    input_folder: &Path,
    output_folder: &Path,
    bitrate: &str,
    format: AudioFormat,
) -> Result<AudioStats> {
    if !input_folder.exists() {
        anyhow::bail!("文件夹不存在: {}", input_folder.display());
    }

    if !output_folder.exists() {
        tokio::fs::create_dir_all(output_folder).await?;
        info!("已创建输出文件夹: {}", output_folder.display());
    }

    let mut stats = AudioStats::default();
    let mut entries = tokio::fs::read_dir(input_folder).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches_format = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase() == format.extension())
            .unwrap_or(false);
        if !matches_format {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let target = mp3_path(&path, output_folder);
        let target_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        // 已转换过的跳过
        if target.exists() {
            info!("跳过: {} (已存在)", target_name);
            stats.skipped += 1;
            continue;
        }

        match convert_file(&path, &target, bitrate).await {
            Ok(()) => {
                info!("转换完成: {} -> {}", name, target_name);
                stats.converted += 1;
            }
            // ffmpeg 缺失时直接中止，继续跑下去没有意义
            Err(e @ AudioError::FfmpegNotFound(_)) => {
                error!("{}", e);
                return Err(e.into());
            }
            Err(e) => {
                error!("转换出错 ({}): {}", name, e);
                stats.failed += 1;
            }
        }
    }

    if stats.converted == 0 && stats.skipped == 0 {
        info!("没有可转换的 {} 文件", format.extension());
    }

    info!(
        "\n处理汇总 - 转换: {} 个, 跳过: {} 个, 失败: {} 个",
        stats.converted, stats.skipped, stats.failed
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_path_mapping() {
        let out = mp3_path(Path::new("/music/song.M4A"), Path::new("/music/mp3_files"));
        assert_eq!(out, PathBuf::from("/music/mp3_files/song.mp3"));
    }

    #[test]
    fn test_audio_format_from_str() {
        assert_eq!(AudioFormat::from_str("m4a").unwrap(), AudioFormat::M4a);
        assert_eq!(AudioFormat::from_str("WAV").unwrap(), AudioFormat::Wav);
        assert!(AudioFormat::from_str("flac").is_err());
    }

    #[tokio::test]
    async fn test_convert_folder_skips_existing_targets() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();

        // 目标已存在，不应触发 ffmpeg
        std::fs::write(input.join("a.m4a"), b"fake audio").unwrap();
        std::fs::write(output.join("a.mp3"), b"already converted").unwrap();

        let stats = convert_folder(&input, &output, "192k", AudioFormat::M4a)
            .await
            .unwrap();
        assert_eq!(stats, AudioStats { converted: 0, skipped: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_convert_folder_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("readme.txt"), b"text").unwrap();

        let stats = convert_folder(&input, &dir.path().join("out"), "192k", AudioFormat::Wav)
            .await
            .unwrap();
        assert_eq!(stats, AudioStats::default());
    }

    #[tokio::test]
    async fn test_convert_folder_missing_input() {
        let result = convert_folder(
            Path::new("/no/such/folder"),
            Path::new("/tmp/out"),
            "192k",
            AudioFormat::M4a,
        )
        .await;
        assert!(result.is_err());
    }
}
