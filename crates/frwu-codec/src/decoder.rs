//! 解码器 trait 定义.
//!
//! 宿主通过此 trait 驱动解码器, 不需要知道具体实现.

use bitflags::bitflags;
use frwu_core::FrwuResult;

use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::frame::VideoFrame;
use crate::packet::Packet;

bitflags! {
    /// 解码器能力标志
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CodecCapabilities: u32 {
        /// 直接写入宿主提供的缓冲区 (direct rendering)
        const DR1 = 1 << 1;
    }
}

/// 解码器 trait
///
/// 解码流程:
/// 1. 调用 `open()` 提供流参数
/// 2. 调用 `send_packet()` 送入数据包
/// 3. 调用 `receive_frame()` 取出解码后的帧
/// 4. 送入空包 (flush) 后 `receive_frame()` 返回 `Eof`
/// 5. 调用 `close()` 归还所有缓冲区
pub trait Decoder: Send {
    /// 获取解码器标识
    fn codec_id(&self) -> CodecId;

    /// 获取解码器名称
    fn name(&self) -> &str;

    /// 解码器能力
    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities::empty()
    }

    /// 使用参数配置解码器
    fn open(&mut self, params: &CodecParameters) -> FrwuResult<()>;

    /// 送入一个数据包进行解码
    ///
    /// # 返回
    /// - `Ok(())`: 数据包已接受
    /// - `Err(FrwuError::NeedMoreData)`: 上一帧尚未取出
    fn send_packet(&mut self, packet: &Packet) -> FrwuResult<()>;

    /// 从解码器取出一帧
    ///
    /// # 返回
    /// - `Ok(frame)`: 成功取出一帧
    /// - `Err(FrwuError::NeedMoreData)`: 需要送入更多数据包
    /// - `Err(FrwuError::Eof)`: 所有帧已取出
    fn receive_frame(&mut self) -> FrwuResult<VideoFrame>;

    /// 刷新解码器, 清空内部状态并归还缓冲区
    fn flush(&mut self);

    /// 关闭解码器, 归还所有缓冲区. 可重复调用.
    fn close(&mut self);
}
