//! 媒体类型定义.

use std::fmt;

/// 媒体流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MediaType {
    /// 视频流
    Video,
    /// 数据流 (无法识别的编解码器归入此类)
    Data,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Data => "data",
        };
        write!(f, "{name}")
    }
}
