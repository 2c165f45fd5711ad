//! 输出帧缓冲区分配接口.
//!
//! 解码器不自己分配像素内存: 每次解码开始时向宿主申请, 下次解码前或关闭时归还.
//! 宿主可以实现 [`BufferAllocator`] 来接入自己的内存池; 这里提供两个实现:
//! - [`DefaultAllocator`]: 每次新分配, 支持行距对齐
//! - [`FramePool`]: 回收归还的缓冲区并复用, 可限制同时借出的数量

use frwu_core::{FrwuError, FrwuResult};
use log::debug;

use crate::frame::VideoFrame;

/// 帧缓冲区分配器
pub trait BufferAllocator: Send {
    /// 按帧的像素格式与尺寸分配各平面, 填充 `data` 与 `linesize`
    fn acquire_buffer(&mut self, frame: &mut VideoFrame) -> FrwuResult<()>;

    /// 归还帧持有的缓冲区
    ///
    /// 对未分配缓冲区的帧调用必须是安全的空操作.
    fn release_buffer(&mut self, frame: &mut VideoFrame);
}

/// 单个平面的布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlaneLayout {
    linesize: usize,
    size: usize,
}

/// 按对齐要求计算帧各平面的布局
fn plane_layouts(frame: &VideoFrame, align: usize) -> FrwuResult<Vec<PlaneLayout>> {
    let pf = frame.pixel_format;
    let plane_count = pf.plane_count() as usize;
    if plane_count == 0 {
        return Err(FrwuError::BufferAcquisitionFailed(format!(
            "像素格式 {pf} 无法分配缓冲区"
        )));
    }
    let mut layouts = Vec::with_capacity(plane_count);
    for plane in 0..plane_count {
        let row = pf.plane_linesize(plane, frame.width).unwrap_or(0);
        let rows = pf.plane_height(plane, frame.height).unwrap_or(0);
        let linesize = row.checked_next_multiple_of(align).ok_or_else(|| {
            FrwuError::OutOfMemory(format!("平面 {plane} 行距溢出: {row} 对齐到 {align}"))
        })?;
        let size = linesize.checked_mul(rows).ok_or_else(|| {
            FrwuError::OutOfMemory(format!("平面 {plane} 大小溢出: {linesize} x {rows}"))
        })?;
        layouts.push(PlaneLayout { linesize, size });
    }
    Ok(layouts)
}

/// 分配一块清零的平面内存, 失败时返回 `OutOfMemory` 而不是中止进程
fn alloc_plane(size: usize) -> FrwuResult<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size)
        .map_err(|e| FrwuError::OutOfMemory(format!("申请 {size} 字节失败: {e}")))?;
    buf.resize(size, 0);
    Ok(buf)
}

fn check_alignment(align: usize) -> FrwuResult<usize> {
    if align == 0 || !align.is_power_of_two() {
        return Err(FrwuError::InvalidConfiguration(format!(
            "行距对齐 {align} 必须是 2 的幂"
        )));
    }
    Ok(align)
}

/// 默认分配器: 每帧新分配清零内存
#[derive(Debug, Clone)]
pub struct DefaultAllocator {
    /// 行距对齐 (字节, 2 的幂)
    align: usize,
}

impl DefaultAllocator {
    /// 创建不做行距对齐的分配器
    pub fn new() -> Self {
        Self { align: 1 }
    }

    /// 创建行距按 `align` 字节对齐的分配器
    pub fn with_alignment(align: usize) -> FrwuResult<Self> {
        Ok(Self {
            align: check_alignment(align)?,
        })
    }
}

impl Default for DefaultAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferAllocator for DefaultAllocator {
    fn acquire_buffer(&mut self, frame: &mut VideoFrame) -> FrwuResult<()> {
        let layouts = plane_layouts(frame, self.align)?;
        let mut data = Vec::with_capacity(layouts.len());
        for layout in &layouts {
            data.push(alloc_plane(layout.size)?);
        }
        frame.data = data;
        frame.linesize = layouts.iter().map(|l| l.linesize).collect();
        Ok(())
    }

    fn release_buffer(&mut self, frame: &mut VideoFrame) {
        frame.data.clear();
        frame.linesize.clear();
    }
}

/// 复用型帧缓冲池
///
/// 归还的平面按大小放回空闲列表, 下次申请同样大小时直接复用.
/// 复用的缓冲区不清零: 解码器会覆盖每一行的有效像素, 对齐填充字节保持上次内容.
#[derive(Debug)]
pub struct FramePool {
    /// 行距对齐
    align: usize,
    /// 空闲平面
    free: Vec<Vec<u8>>,
    /// 空闲列表上限
    max_pooled: usize,
    /// 当前借出的帧数
    outstanding: usize,
    /// 同时借出的帧数上限, `None` 表示不限
    max_outstanding: Option<usize>,
}

/// 空闲列表默认上限
const DEFAULT_MAX_POOLED: usize = 8;

impl FramePool {
    /// 创建不限借出数量的缓冲池
    pub fn new() -> Self {
        Self {
            align: 1,
            free: Vec::new(),
            max_pooled: DEFAULT_MAX_POOLED,
            outstanding: 0,
            max_outstanding: None,
        }
    }

    /// 设置行距对齐
    pub fn with_alignment(mut self, align: usize) -> FrwuResult<Self> {
        self.align = check_alignment(align)?;
        Ok(self)
    }

    /// 限制同时借出的帧数, 超出时申请失败
    pub fn with_max_outstanding(mut self, limit: usize) -> Self {
        self.max_outstanding = Some(limit);
        self
    }

    /// 当前借出的帧数
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// 空闲列表中的平面数
    pub fn pooled(&self) -> usize {
        self.free.len()
    }

    fn take_plane(&mut self, size: usize) -> FrwuResult<Vec<u8>> {
        match self.free.iter().position(|buf| buf.len() == size) {
            Some(idx) => Ok(self.free.swap_remove(idx)),
            None => alloc_plane(size),
        }
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}

impl BufferAllocator for FramePool {
    fn acquire_buffer(&mut self, frame: &mut VideoFrame) -> FrwuResult<()> {
        if let Some(limit) = self.max_outstanding {
            if self.outstanding >= limit {
                return Err(FrwuError::BufferAcquisitionFailed(format!(
                    "缓冲池已借出 {} 帧, 达到上限 {limit}",
                    self.outstanding
                )));
            }
        }
        let layouts = plane_layouts(frame, self.align)?;
        let mut data = Vec::with_capacity(layouts.len());
        for layout in &layouts {
            data.push(self.take_plane(layout.size)?);
        }
        frame.data = data;
        frame.linesize = layouts.iter().map(|l| l.linesize).collect();
        self.outstanding += 1;
        Ok(())
    }

    fn release_buffer(&mut self, frame: &mut VideoFrame) {
        if !frame.has_buffer() {
            return;
        }
        self.outstanding = self.outstanding.saturating_sub(1);
        for plane in frame.data.drain(..) {
            if self.free.len() < self.max_pooled {
                self.free.push(plane);
            }
        }
        frame.linesize.clear();
        debug!(
            "缓冲池回收帧: 借出 {}, 空闲 {}",
            self.outstanding,
            self.free.len()
        );
    }
}
