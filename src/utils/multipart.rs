//! multipart 表单读取：一个 JSON 文本部分加一个可选的图片部分

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;

use crate::config::LimitConfig;
use crate::errors::{ExamSystemError, Result};
use crate::utils::ImageStore;

pub const INVALID_FORMAT: &str = "Invalid format or missing fields.";

/// 名为 `image` 的表单字段
pub const IMAGE_FIELD: &str = "image";

/// 表单各部分的大小上限
#[derive(Debug, Clone, Copy)]
pub struct FormLimits {
    pub json: usize,
    pub image: usize,
}

impl FormLimits {
    pub fn new(limits: &LimitConfig, images: &ImageStore) -> Self {
        Self {
            json: limits.max_payload_size,
            image: images.max_size(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct JsonImageForm {
    pub json: Option<String>,
    pub image: Option<UploadedImage>,
}

impl JsonImageForm {
    /// 解析 JSON 部分，缺失时返回 None
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.json {
            Some(raw) => parse_json_part(raw).map(Some),
            None => Ok(None),
        }
    }
}

pub fn parse_json_part<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        tracing::debug!("JSON 表单字段解析失败: {}", e);
        ExamSystemError::validation(INVALID_FORMAT)
    })
}

/// 读取表单，未知字段只读取不保存
pub async fn read_json_image_form(
    mut payload: Multipart,
    json_field: &str,
    limits: FormLimits,
) -> Result<JsonImageForm> {
    let mut form = JsonImageForm::default();

    while let Some(mut field) = payload.try_next().await.map_err(invalid_multipart)? {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let file_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let (limit, too_large) = if name == json_field {
            (limits.json, "Form field exceeds the size limit")
        } else if name == IMAGE_FIELD {
            (limits.image, "Image size exceeds the limit")
        } else {
            while field.try_next().await.map_err(invalid_multipart)?.is_some() {}
            continue;
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid_multipart)? {
            if bytes.len() + chunk.len() > limit {
                return Err(ExamSystemError::payload_too_large(too_large));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == json_field {
            let text =
                String::from_utf8(bytes).map_err(|_| ExamSystemError::validation(INVALID_FORMAT))?;
            form.json = Some(text);
        } else {
            // 浏览器会为未选择的文件发送空的部分
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            form.image = Some(UploadedImage { file_name, bytes });
        }
    }

    Ok(form)
}

fn invalid_multipart(e: actix_multipart::MultipartError) -> ExamSystemError {
    ExamSystemError::validation(format!("Invalid multipart payload: {e}"))
}
