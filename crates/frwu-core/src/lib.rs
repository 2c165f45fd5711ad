//! # frwu-core
//!
//! FRWU 解码器的核心类型: 错误定义、像素格式、有理数与时间戳.
//!
//! 本 crate 不依赖任何编解码逻辑, 供 `frwu-codec` 与宿主程序共用.

pub mod error;
pub mod media_type;
pub mod pixel_format;
pub mod rational;
pub mod timestamp;

// 重导出常用类型
pub use error::{FrwuError, FrwuResult};
pub use media_type::MediaType;
pub use pixel_format::PixelFormat;
pub use rational::Rational;
pub use timestamp::Timestamp;
