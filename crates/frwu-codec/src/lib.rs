//! # frwu-codec
//!
//! Forward Uncompressed (FRWU) 隔行原始视频解码器, 以及宿主对接所需的抽象:
//! 解码器 trait、注册表、帧缓冲区分配接口和码流分包器.
//!
//! ## 使用示例
//!
//! ```rust
//! use frwu_codec::{DefaultAllocator, FrwuDecoder, StreamConfig};
//!
//! let config = StreamConfig::new(720, 486).unwrap();
//! let mut decoder = FrwuDecoder::new(config, Box::new(DefaultAllocator::new()));
//!
//! // 数据不足时返回 PacketTooSmall, 解码器仍可继续使用
//! let err = decoder.decode_frame(b"FRW1").unwrap_err();
//! assert!(err.is_invalid_data());
//! ```

pub mod buffer;
pub mod codec_id;
pub mod codec_parameters;
pub mod decoder;
pub mod decoders;
pub mod frame;
pub mod packet;
pub mod parsers;
pub mod registry;

// 重导出常用类型
pub use buffer::{BufferAllocator, DefaultAllocator, FramePool};
pub use codec_id::CodecId;
pub use codec_parameters::{CodecParameters, CodecParamsType, VideoCodecParams};
pub use decoder::{CodecCapabilities, Decoder};
pub use decoders::frwu::{FieldHeader, FrwuDecoder, StreamConfig};
pub use frame::{PictureType, VideoFrame};
pub use packet::Packet;
pub use parsers::FrwuParser;
pub use registry::CodecRegistry;

/// 注册所有内置编解码器
pub fn register_all(registry: &mut CodecRegistry) {
    decoders::register_all_decoders(registry);
}
