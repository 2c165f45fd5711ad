//! # frwu
//!
//! 纯 Rust 实现的 Forward Uncompressed (FRWU) 隔行原始视频解码器.
//!
//! FRWU 每帧一个数据包, 包内两个场分别携带偶数行与奇数行的 UYVY 4:2:2 像素.
//! 解码器负责校验包头、逐场检查长度, 并把两场交错写入宿主提供的帧缓冲区.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use frwu::codec::{FramePool, FrwuDecoder, StreamConfig};
//!
//! let packet = std::fs::read("frame.frwu").unwrap();
//! let config = StreamConfig::new(720, 486).unwrap();
//! let mut decoder = FrwuDecoder::new(config, Box::new(FramePool::new()));
//! let (picture, consumed) = decoder.decode_frame(&packet).unwrap();
//! println!("{}x{} {} 消耗 {consumed} 字节", picture.width, picture.height, picture.pixel_format);
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `frwu-core` | 错误类型、像素格式、时间基 |
//! | `frwu-codec` | 解码器、分包器、缓冲区分配接口 |

/// 核心类型
pub use frwu_core as core;

/// 解码器与宿主接口
pub use frwu_codec as codec;

/// 获取版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// 创建已注册所有内置解码器的注册表
pub fn default_codec_registry() -> frwu_codec::CodecRegistry {
    let mut registry = frwu_codec::CodecRegistry::new();
    frwu_codec::register_all(&mut registry);
    registry
}
