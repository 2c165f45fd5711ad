//! 编解码器注册表.
//!
//! 宿主按 `CodecId` 或名称查找并实例化解码器.

use std::collections::HashMap;

use frwu_core::{FrwuError, FrwuResult};

use crate::codec_id::CodecId;
use crate::decoder::Decoder;

/// 解码器工厂函数类型
pub type DecoderFactory = fn() -> FrwuResult<Box<dyn Decoder>>;

/// 解码器注册条目
struct DecoderEntry {
    /// 解码器名称
    name: String,
    /// 工厂函数
    factory: DecoderFactory,
}

/// 编解码器注册表
pub struct CodecRegistry {
    /// 解码器工厂映射, 同一 ID 下先注册的优先
    decoders: HashMap<CodecId, Vec<DecoderEntry>>,
}

impl CodecRegistry {
    /// 创建空的注册表
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// 注册一个解码器
    pub fn register_decoder(
        &mut self,
        codec_id: CodecId,
        name: impl Into<String>,
        factory: DecoderFactory,
    ) {
        self.decoders
            .entry(codec_id)
            .or_default()
            .push(DecoderEntry {
                name: name.into(),
                factory,
            });
    }

    /// 创建指定编解码器 ID 的解码器实例
    pub fn create_decoder(&self, codec_id: CodecId) -> FrwuResult<Box<dyn Decoder>> {
        let entry = self
            .decoders
            .get(&codec_id)
            .and_then(|entries| entries.first())
            .ok_or_else(|| FrwuError::CodecNotFound(format!("未找到 {codec_id} 的解码器")))?;
        (entry.factory)()
    }

    /// 按名称创建解码器实例
    pub fn create_decoder_by_name(&self, name: &str) -> FrwuResult<Box<dyn Decoder>> {
        let entry = self
            .decoders
            .values()
            .flatten()
            .find(|entry| entry.name == name)
            .ok_or_else(|| FrwuError::CodecNotFound(format!("未找到名为 {name} 的解码器")))?;
        (entry.factory)()
    }

    /// 获取所有已注册的解码器名称
    pub fn list_decoders(&self) -> Vec<(CodecId, &str)> {
        let mut result = Vec::new();
        for (id, entries) in &self.decoders {
            for entry in entries {
                result.push((*id, entry.name.as_str()));
            }
        }
        result
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
