//! 像素格式定义.

use std::fmt;

/// 像素格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// 未指定
    None,
    /// UYVY 4:2:2 打包, 每 2 像素 4 字节 (U Y0 V Y1), FRWU 输出格式
    Uyvy422,
}

impl PixelFormat {
    /// 平面数量
    pub const fn plane_count(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Uyvy422 => 1,
        }
    }

    /// 计算指定平面每行的有效字节数 (不含对齐填充)
    ///
    /// # 返回
    /// - `Some(bytes)`: 该平面每行的字节数
    /// - `None`: 格式为 None 或平面索引超出范围
    pub fn plane_linesize(&self, plane: usize, width: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        match self {
            // 4:2:2 打包: 2 像素共用一组 4 字节
            Self::Uyvy422 => (width as usize).checked_mul(2),
            Self::None => None,
        }
    }

    /// 计算指定平面的行数
    pub fn plane_height(&self, plane: usize, height: u32) -> Option<usize> {
        if plane >= self.plane_count() as usize {
            return None;
        }
        // 无垂直子采样
        Some(height as usize)
    }

    /// 计算整帧的字节数 (紧密排列, 无对齐填充)
    ///
    /// 溢出或格式为 None 时返回 `None`.
    pub fn frame_size(&self, width: u32, height: u32) -> Option<usize> {
        if *self == Self::None {
            return None;
        }
        let mut total = 0usize;
        for plane in 0..self.plane_count() as usize {
            let linesize = self.plane_linesize(plane, width)?;
            let plane_h = self.plane_height(plane, height)?;
            total = total.checked_add(linesize.checked_mul(plane_h)?)?;
        }
        Some(total)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Uyvy422 => "uyvy422",
        };
        write!(f, "{name}")
    }
}
