//! 压缩数据包 (Packet).
//!
//! FRWU 中一个数据包恰好对应一帧 (两个场).

use bytes::Bytes;
use frwu_core::Rational;

/// 数据包
#[derive(Debug, Clone)]
pub struct Packet {
    /// 码流数据
    pub data: Bytes,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 数据包时长 (以 time_base 为单位)
    pub duration: i64,
    /// 时间基
    pub time_base: Rational,
}

impl Packet {
    /// 创建空数据包
    pub fn empty() -> Self {
        Self {
            data: Bytes::new(),
            pts: frwu_core::timestamp::NOPTS_VALUE,
            duration: 0,
            time_base: Rational::UNDEFINED,
        }
    }

    /// 从数据创建数据包
    pub fn from_data(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Self::empty()
        }
    }

    /// 是否为空包 (flush packet)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
