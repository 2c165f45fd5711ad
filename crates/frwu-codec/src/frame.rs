//! 解码后的帧数据 (Frame).
//!
//! 帧的像素存储由宿主通过 [`BufferAllocator`](crate::buffer::BufferAllocator) 提供,
//! 解码器只负责按行写入.

use frwu_core::{PixelFormat, Rational};

/// 视频帧
///
/// 像素数据按平面存储, 每个平面由若干行组成, 行距为 `linesize`.
/// `linesize` 可以大于一行的有效字节数 (对齐填充).
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// 各平面的像素数据, 未分配缓冲区时为空
    pub data: Vec<Vec<u8>>,
    /// 各平面每行的字节数 (linesize / stride)
    pub linesize: Vec<usize>,
    /// 宽度 (像素)
    pub width: u32,
    /// 高度 (像素)
    pub height: u32,
    /// 像素格式
    pub pixel_format: PixelFormat,
    /// 显示时间戳 (PTS)
    pub pts: i64,
    /// 时间基
    pub time_base: Rational,
    /// 帧时长 (以 time_base 为单位)
    pub duration: i64,
    /// 是否为关键帧
    pub is_keyframe: bool,
    /// 图片类型
    pub picture_type: PictureType,
    /// 是否为隔行扫描帧
    pub interlaced: bool,
    /// 顶场优先
    pub top_field_first: bool,
}

impl VideoFrame {
    /// 创建未分配缓冲区的视频帧
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            data: Vec::new(),
            linesize: Vec::new(),
            width,
            height,
            pixel_format,
            pts: frwu_core::timestamp::NOPTS_VALUE,
            time_base: Rational::UNDEFINED,
            duration: 0,
            is_keyframe: false,
            picture_type: PictureType::None,
            interlaced: false,
            top_field_first: false,
        }
    }

    /// 是否持有像素缓冲区
    pub fn has_buffer(&self) -> bool {
        self.data.iter().any(|plane| !plane.is_empty())
    }

    /// 指定平面一行的有效字节数
    fn row_bytes(&self, plane: usize) -> Option<usize> {
        self.pixel_format.plane_linesize(plane, self.width)
    }

    /// 获取指定平面第 `y` 行的有效像素 (不含对齐填充)
    pub fn row(&self, plane: usize, y: usize) -> Option<&[u8]> {
        let row_bytes = self.row_bytes(plane)?;
        let start = y.checked_mul(*self.linesize.get(plane)?)?;
        self.data.get(plane)?.get(start..start.checked_add(row_bytes)?)
    }

    /// 获取指定平面第 `y` 行的可写切片 (不含对齐填充)
    ///
    /// 缓冲区不足以容纳该行时返回 `None`.
    pub fn row_mut(&mut self, plane: usize, y: usize) -> Option<&mut [u8]> {
        let row_bytes = self.row_bytes(plane)?;
        let start = y.checked_mul(*self.linesize.get(plane)?)?;
        self.data
            .get_mut(plane)?
            .get_mut(start..start.checked_add(row_bytes)?)
    }

    /// 去掉行对齐填充, 按平面顺序输出紧密排列的像素数据
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            self.pixel_format
                .frame_size(self.width, self.height)
                .unwrap_or(0),
        );
        for plane in 0..self.data.len() {
            let rows = self
                .pixel_format
                .plane_height(plane, self.height)
                .unwrap_or(0);
            for y in 0..rows {
                if let Some(row) = self.row(plane, y) {
                    out.extend_from_slice(row);
                }
            }
        }
        out
    }
}

/// 图片类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PictureType {
    /// 未指定
    #[default]
    None,
    /// I 帧 (关键帧, 帧内编码)
    I,
}
