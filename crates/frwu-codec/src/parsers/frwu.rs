//! FRWU 码流分包器.
//!
//! 把首尾相接的 FRWU 数据包 (例如从容器中导出的视频轨) 切分为单个数据包.
//! 只读取包头和场头, 不触碰像素数据.

use byteorder::{ByteOrder, LittleEndian};
use frwu_core::{FrwuError, FrwuResult};

use crate::decoders::frwu::{
    FIELD_COUNT, FIELD_HEADER_SIZE, FRWU_TAG, FieldHeader, StreamConfig, TAG_SIZE,
};

/// FRWU 分包器
#[derive(Debug, Clone, Copy)]
pub struct FrwuParser {
    config: StreamConfig,
}

impl FrwuParser {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    /// 扫描开头的数据包
    ///
    /// 数据不足以确定包长时返回 `Ok(None)`.
    fn scan(&self, data: &[u8]) -> FrwuResult<Option<([FieldHeader; FIELD_COUNT], usize)>> {
        if data.len() < TAG_SIZE {
            return Ok(None);
        }
        let tag = LittleEndian::read_u32(&data[..TAG_SIZE]);
        if tag != FRWU_TAG {
            return Err(FrwuError::IncorrectMarker { found: tag });
        }

        let mut headers = [FieldHeader::default(); FIELD_COUNT];
        let mut offset = TAG_SIZE;
        for (field, slot) in headers.iter_mut().enumerate() {
            let Some(raw) = data
                .get(offset..)
                .and_then(|rest| rest.get(..FIELD_HEADER_SIZE))
            else {
                return Ok(None);
            };
            let header = FieldHeader::parse(raw);
            let required = self.config.min_field_size(field);
            if (header.size as usize) < required {
                return Err(FrwuError::FieldTooSmall {
                    field,
                    size: header.size,
                    required,
                });
            }
            offset = offset
                .checked_add(FIELD_HEADER_SIZE)
                .and_then(|end| end.checked_add(header.size as usize))
                .ok_or_else(|| FrwuError::InvalidData(format!("场 {field} 大小溢出")))?;
            *slot = header;
        }

        if data.len() < offset {
            return Ok(None);
        }
        Ok(Some((headers, offset)))
    }

    /// 开头数据包的总长度, 数据不足时返回 `Ok(None)`
    pub fn packet_size(&self, data: &[u8]) -> FrwuResult<Option<usize>> {
        Ok(self.scan(data)?.map(|(_, size)| size))
    }

    /// 解析数据包的两个场头
    pub fn parse_field_headers(&self, packet: &[u8]) -> FrwuResult<[FieldHeader; FIELD_COUNT]> {
        match self.scan(packet)? {
            Some((headers, _)) => Ok(headers),
            None => Err(FrwuError::InvalidData(format!(
                "数据包不完整: {} 字节",
                packet.len()
            ))),
        }
    }

    /// 把完整码流切分为数据包
    ///
    /// 末尾残留不完整数据包时返回 `InvalidData`.
    pub fn split<'a>(&self, data: &'a [u8]) -> FrwuResult<Vec<&'a [u8]>> {
        let mut packets = Vec::new();
        let mut rest = data;
        while !rest.is_empty() {
            let Some(size) = self.packet_size(rest)? else {
                return Err(FrwuError::InvalidData(format!(
                    "码流末尾 {} 字节不构成完整数据包 (偏移 {})",
                    rest.len(),
                    data.len() - rest.len()
                )));
            };
            let (packet, tail) = rest.split_at(size);
            packets.push(packet);
            rest = tail;
        }
        Ok(packets)
    }
}
