//! 统一错误类型定义.
//!
//! 解码器、分包器与宿主缓冲区分配器共用的错误类型.

use thiserror::Error;

/// FRWU 统一错误类型
#[derive(Debug, Error)]
pub enum FrwuError {
    /// 无效的流配置 (宽度为奇数、尺寸为 0 等), 初始化阶段即失败
    #[error("无效配置: {0}")]
    InvalidConfiguration(String),

    /// 内存分配失败
    #[error("内存分配失败: {0}")]
    OutOfMemory(String),

    /// 宿主无法提供输出缓冲区
    #[error("获取缓冲区失败: {0}")]
    BufferAcquisitionFailed(String),

    /// 数据包长度不足
    #[error("数据包过小: 需要 {required} 字节, 实际 {available} 字节")]
    PacketTooSmall {
        /// 所需字节数
        required: usize,
        /// 实际剩余字节数
        available: usize,
    },

    /// 包头标记不是 `FRW1`
    #[error("包头标记错误: 0x{found:08x}")]
    IncorrectMarker {
        /// 读到的小端 32 位标记值
        found: u32,
    },

    /// 场声明的大小小于该场像素数据的最小字节数
    #[error("场 {field} 大小 {size} 过小 (至少需要 {required})")]
    FieldTooSmall {
        /// 场索引 (0 = 顶场, 1 = 底场)
        field: usize,
        /// 声明的场大小
        size: u32,
        /// 最小场大小
        required: usize,
    },

    /// 其他无效数据
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 编解码器状态错误 (如未打开即送包)
    #[error("编解码器错误: {0}")]
    Codec(String),

    /// 未找到指定的编解码器
    #[error("未找到编解码器: {0}")]
    CodecNotFound(String),

    /// 数据不足, 需要更多输入
    #[error("数据不足, 需要更多输入")]
    NeedMoreData,

    /// 已到达流末尾
    #[error("已到达流末尾")]
    Eof,
}

impl FrwuError {
    /// 是否为码流数据错误
    ///
    /// 这类错误只影响当前数据包, 解码器实例仍可继续使用.
    pub fn is_invalid_data(&self) -> bool {
        matches!(
            self,
            Self::PacketTooSmall { .. }
                | Self::IncorrectMarker { .. }
                | Self::FieldTooSmall { .. }
                | Self::InvalidData(_)
        )
    }
}

/// FRWU 统一 Result 类型
pub type FrwuResult<T> = Result<T, FrwuError>;
