//! 编解码器标识符.

use frwu_core::MediaType;
use std::fmt;

/// 编解码器标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    /// 未知编解码器
    None,
    /// Forward Uncompressed: 隔行 UYVY 4:2:2 原始视频
    Frwu,
}

impl CodecId {
    /// 获取编解码器对应的媒体类型
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::None => MediaType::Data,
            Self::Frwu => MediaType::Video,
        }
    }

    /// 获取编解码器的短名称
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Frwu => "frwu",
        }
    }

    /// 获取编解码器的完整名称
    pub const fn long_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Frwu => "Forward Uncompressed",
        }
    }

    /// 按短名称查找
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "frwu" => Some(Self::Frwu),
            _ => None,
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frwu_id() {
        assert_eq!(CodecId::Frwu.media_type(), MediaType::Video);
        assert_eq!(CodecId::Frwu.to_string(), "frwu");
        assert_eq!(CodecId::Frwu.long_name(), "Forward Uncompressed");
        assert_eq!(CodecId::from_name("frwu"), Some(CodecId::Frwu));
        assert_eq!(CodecId::from_name("h264"), None);
    }
}
