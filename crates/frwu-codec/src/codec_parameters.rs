//! 编解码器参数.
//!
//! 宿主 (通常是容器解析层) 通过它把流参数交给解码器.

use crate::codec_id::CodecId;

/// 编解码器参数
#[derive(Debug, Clone)]
pub struct CodecParameters {
    /// 编解码器标识
    pub codec_id: CodecId,
    /// 媒体类型特定参数
    pub params: CodecParamsType,
}

/// 媒体类型特定参数
#[derive(Debug, Clone)]
pub enum CodecParamsType {
    /// 视频参数
    Video(VideoCodecParams),
    /// 无特定参数
    None,
}

/// 视频编解码器参数
#[derive(Debug, Clone)]
pub struct VideoCodecParams {
    /// 宽度 (像素)
    pub width: u32,
    /// 高度 (像素)
    pub height: u32,
}

impl CodecParameters {
    /// 以宽高构造视频参数
    pub fn video(codec_id: CodecId, width: u32, height: u32) -> Self {
        Self {
            codec_id,
            params: CodecParamsType::Video(VideoCodecParams { width, height }),
        }
    }

    /// 获取视频参数 (如果是视频流)
    pub fn video_params(&self) -> Option<&VideoCodecParams> {
        match &self.params {
            CodecParamsType::Video(v) => Some(v),
            CodecParamsType::None => None,
        }
    }
}
