//! 图片保存
//!
//! 只按扩展名校验，文件名为 `{时间戳}-{uuid}{扩展名}`。

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::{ExamSystemError, Result};
use crate::utils::multipart::UploadedImage;

pub const INVALID_IMAGE_TYPE: &str = "Invalid file type. Only .jpg and .png files are accepted";

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    max_size: usize,
    allowed_extensions: Vec<String>,
}

impl ImageStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_size: config.max_size,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// 小写扩展名，带点
    fn extension_of(file_name: &str) -> Option<String> {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
    }

    /// 校验扩展名，返回规范化后的扩展名
    pub fn validate(&self, file_name: &str) -> Result<String> {
        match Self::extension_of(file_name) {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(ext),
            _ => Err(ExamSystemError::unsupported_media(INVALID_IMAGE_TYPE)),
        }
    }

    /// 保存图片，返回可存入数据库的路径
    pub fn store(&self, image: &UploadedImage) -> Result<String> {
        let ext = self.validate(&image.file_name)?;

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let stored_name = format!("{}-{}{}", chrono::Utc::now().timestamp(), Uuid::new_v4(), ext);
        let path = self.dir.join(stored_name);
        fs::write(&path, &image.bytes)?;

        Ok(path.to_string_lossy().replace('\\', "/"))
    }

    /// 保存失败时记录警告并视为没有图片
    pub fn store_lenient(&self, image: &UploadedImage) -> Option<String> {
        match self.store(image) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("图片保存失败，忽略该图片: {}", e);
                None
            }
        }
    }
}
