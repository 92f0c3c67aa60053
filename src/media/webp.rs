//! 图片批量转 WebP
//!
//! 把文件夹内的 jpg / jpeg / png 转成 WebP，输出到 image_output 子目录。
//! 每个文件的转换彼此独立，用 Semaphore 限制同时进行的任务数。

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::error::AppError;

/// 输出子目录名
const OUTPUT_FOLDER_NAME: &str = "image_output";

/// 转换统计
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConvertStats {
    pub success: usize,
    pub failed: usize,
}

/// 判断文件是否为支持的图片格式（扩展名不区分大小写）
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            lower == "jpg" || lower == "jpeg" || lower == "png"
        })
        .unwrap_or(false)
}

/// 计算输出文件路径（扩展名换成 .webp）
pub fn output_path(input: &Path, output_folder: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output_folder.join(format!("{}.webp", stem))
}

/// 单个文件转 WebP（阻塞调用）
///
/// # 参数
/// - `quality`: WebP 质量 (1-100)
pub fn convert_to_webp(input: &Path, output: &Path, quality: u8) -> Result<()> {
    let img = image::open(input).with_context(|| format!("无法打开图片: {}", input.display()))?;

    // 非 RGB/RGBA 模式统一转成 RGB 再编码
    let img = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let encoder = webp::Encoder::from_image(&img)
        .map_err(|e| AppError::Other(format!("WebP 编码器创建失败: {}", e)))?;
    let encoded = encoder.encode(quality as f32);

    std::fs::write(output, &*encoded)
        .map_err(|e| AppError::file_write_failed(output.display().to_string(), e))?;

    Ok(())
}

/// 把文件夹内的所有图片转成 WebP
///
/// # 参数
/// - `folder`: 输入文件夹
/// - `quality`: WebP 质量 (1-100)
/// - `max_workers`: 同时进行的任务数
pub async fn process_images(folder: &Path, quality: u8, max_workers: usize) -> Result<ConvertStats> {
    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder.display());
    }
    if !folder.is_dir() {
        anyhow::bail!("不是文件夹: {}", folder.display());
    }

    // 创建输出目录
    let output_folder = folder.join(OUTPUT_FOLDER_NAME);
    tokio::fs::create_dir_all(&output_folder)
        .await
        .with_context(|| format!("无法创建输出目录: {}", output_folder.display()))?;

    // 收集待转换的图片
    let mut image_files = Vec::new();
    let mut entries = tokio::fs::read_dir(folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder.display()))?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            image_files.push(path);
        }
    }

    if image_files.is_empty() {
        info!("没有可转换的图片文件");
        return Ok(ConvertStats::default());
    }

    info!("找到 {} 个图片文件", image_files.len());
    info!("输出目录: {}", output_folder.display());
    info!("WebP 质量: {}%", quality);

    // 有限并发转换（每个任务完全独立）
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut handles = Vec::new();

    for input in image_files {
        let permit = semaphore.clone().acquire_owned().await?;
        let output = output_path(&input, &output_folder);

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let result =
                tokio::task::spawn_blocking(move || convert_to_webp(&input, &output, quality))
                    .await;
            match result {
                Ok(Ok(())) => Ok(name),
                Ok(Err(e)) => Err((name, e.to_string())),
                Err(e) => Err((name, e.to_string())),
            }
        });
        handles.push(handle);
    }

    let mut stats = ConvertStats::default();
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(Ok(name)) => {
                info!("✓ 转换完成: {}", name);
                stats.success += 1;
            }
            Ok(Err((name, message))) => {
                error!("❌ 转换失败: {} - {}", name, message);
                stats.failed += 1;
            }
            Err(e) => {
                error!("❌ 任务执行失败: {}", e);
                stats.failed += 1;
            }
        }
    }

    info!("\n转换完成! 成功: {} 个", stats.success);
    if stats.failed > 0 {
        info!("失败: {} 个", stats.failed);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.JPEG")));
        assert!(is_supported_image(Path::new("a.PNG")));
        assert!(!is_supported_image(Path::new("a.webp")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn test_output_path_mapping() {
        let out = output_path(Path::new("/in/photo.PNG"), Path::new("/in/image_output"));
        assert_eq!(out, PathBuf::from("/in/image_output/photo.webp"));
    }

    #[test]
    fn test_convert_to_webp_produces_riff_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("red.png");
        let output = dir.path().join("red.webp");

        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(8, 8, Rgb([255u8, 0, 0]));
        img.save(&input).unwrap();

        convert_to_webp(&input, &output, 85).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[tokio::test]
    async fn test_process_images_counts() {
        let dir = tempfile::tempdir().unwrap();
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(4, 4, Rgb([0u8, 128, 255]));
        img.save(dir.path().join("one.png")).unwrap();
        img.save(dir.path().join("two.jpg")).unwrap();
        std::fs::write(dir.path().join("note.txt"), "不是图片").unwrap();

        let stats = process_images(dir.path(), 85, 2).await.unwrap();
        assert_eq!(stats, ConvertStats { success: 2, failed: 0 });
        assert!(dir.path().join("image_output/one.webp").exists());
        assert!(dir.path().join("image_output/two.webp").exists());
    }

    #[tokio::test]
    async fn test_process_images_missing_folder() {
        let result = process_images(Path::new("/no/such/folder"), 85, 2).await;
        assert!(result.is_err());
    }
}
