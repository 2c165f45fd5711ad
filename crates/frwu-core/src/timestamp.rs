//! 时间戳类型.
//!
//! 解码器不解释时间戳, 只把数据包上的 pts 原样搬到输出帧上.

use crate::rational::Rational;
use std::fmt;

/// 表示"未定义"的时间戳值
pub const NOPTS_VALUE: i64 = i64::MIN;

/// 时间戳: 整数值 + 时间基
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    /// 时间戳值, `NOPTS_VALUE` 表示未定义
    pub pts: i64,
    /// 时间基
    pub time_base: Rational,
}

impl Timestamp {
    pub const fn new(pts: i64, time_base: Rational) -> Self {
        Self { pts, time_base }
    }

    /// 判断时间戳是否有效
    pub const fn is_valid(&self) -> bool {
        self.pts != NOPTS_VALUE && self.time_base.is_valid()
    }

    /// 转换为秒, 无效时间戳返回 `None`
    pub fn to_seconds(&self) -> Option<f64> {
        self.is_valid()
            .then(|| self.pts as f64 * self.time_base.to_f64())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_seconds() {
            Some(secs) => write!(f, "{secs:.6}s"),
            None => write!(f, "NOPTS"),
        }
    }
}
