//! Forward Uncompressed (FRWU) 解码器.
//!
//! 每个数据包是一帧隔行 UYVY 4:2:2 原始视频, 由两个独立带长度前缀的场组成:
//!
//! ```text
//! +--------+-------------+-------------+----------------+-------------+-------------+----------------+
//! | "FRW1" | 场0 flags   | 场0 size    | 场0 像素+填充  | 场1 flags   | 场1 size    | 场1 像素+填充  |
//! | 4 字节 | 4 字节      | 4 字节 (LE) | size 字节      | 4 字节      | 4 字节 (LE) | size 字节      |
//! +--------+-------------+-------------+----------------+-------------+-------------+----------------+
//! ```
//!
//! 场 0 为顶场 (偶数行), 高度为 `ceil(height / 2)`; 场 1 为底场 (奇数行), 高度为 `floor(height / 2)`.
//! flags 的含义未知, 只原样保留在 [`FieldHeader`] 中.

use byteorder::{ByteOrder, LittleEndian};
use frwu_core::{FrwuError, FrwuResult, PixelFormat};
use log::{debug, error};

use crate::buffer::{BufferAllocator, DefaultAllocator};
use crate::codec_id::CodecId;
use crate::codec_parameters::CodecParameters;
use crate::decoder::{CodecCapabilities, Decoder};
use crate::frame::{PictureType, VideoFrame};
use crate::packet::Packet;

/// 包头标记 `MKTAG('F', 'R', 'W', '1')`
pub const FRWU_TAG: u32 = u32::from_le_bytes(*b"FRW1");

/// 包头标记长度
pub const TAG_SIZE: usize = 4;

/// 场头长度: 4 字节 flags + 4 字节 size
pub const FIELD_HEADER_SIZE: usize = 8;

/// 每帧场数
pub const FIELD_COUNT: usize = 2;

/// 输出像素格式
pub const OUTPUT_FORMAT: PixelFormat = PixelFormat::Uyvy422;

/// 流参数
///
/// 构造时校验, 之后不可变.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    width: u32,
    height: u32,
    /// 预计算: 每行字节数 (`width * 2`)
    row_bytes: usize,
    /// 预计算: 最小数据包长度
    min_packet_size: usize,
}

impl StreamConfig {
    /// 校验并创建流参数
    ///
    /// 宽度必须为偶数 (UYVY 每 2 像素一组), 宽高不能为 0.
    pub fn new(width: u32, height: u32) -> FrwuResult<Self> {
        if width & 1 != 0 {
            return Err(FrwuError::InvalidConfiguration(format!(
                "frwu 需要偶数宽度, 实际为 {width}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(FrwuError::InvalidConfiguration(format!(
                "宽度和高度不能为 0: {width}x{height}"
            )));
        }
        let frame_size = OUTPUT_FORMAT.frame_size(width, height);
        let min_packet_size = frame_size
            .and_then(|size| size.checked_add(TAG_SIZE + FIELD_COUNT * FIELD_HEADER_SIZE))
            .ok_or_else(|| {
                FrwuError::InvalidConfiguration(format!("帧尺寸 {width}x{height} 过大"))
            })?;
        Ok(Self {
            width,
            height,
            row_bytes: width as usize * 2,
            min_packet_size,
        })
    }

    /// 从编解码器参数中提取宽高
    pub fn from_params(params: &CodecParameters) -> FrwuResult<Self> {
        let video = params.video_params().ok_or_else(|| {
            FrwuError::InvalidConfiguration("frwu 解码器需要视频参数".into())
        })?;
        Self::new(video.width, video.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 每行像素数据的字节数
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// 数据包最小长度: 包头 + 两个场头 + 整帧像素
    pub fn min_packet_size(&self) -> usize {
        self.min_packet_size
    }

    /// 场的行数, 高度为奇数时顶场多一行
    pub fn field_height(&self, field: usize) -> usize {
        let h = self.height as usize;
        if field == 0 { h.div_ceil(2) } else { h / 2 }
    }

    /// 场的最小字节数
    pub fn min_field_size(&self, field: usize) -> usize {
        self.row_bytes * self.field_height(field)
    }
}

/// 场头
///
/// `flags` 的语义未确认 (可能有一位标记底场), 保留原始字节供排查使用.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldHeader {
    /// 原始 flags 字节
    pub flags: [u8; 4],
    /// 场数据大小 (含填充)
    pub size: u32,
}

impl FieldHeader {
    /// 从 8 字节场头解析
    pub(crate) fn parse(header: &[u8]) -> Self {
        let mut flags = [0u8; 4];
        flags.copy_from_slice(&header[..4]);
        Self {
            flags,
            size: LittleEndian::read_u32(&header[4..FIELD_HEADER_SIZE]),
        }
    }
}

/// FRWU 解码器
pub struct FrwuDecoder {
    /// 流参数, 未打开时为 None
    config: Option<StreamConfig>,
    /// 宿主提供的缓冲区分配器
    allocator: Box<dyn BufferAllocator>,
    /// 上次解码输出的帧, 下次解码前归还
    picture: Option<VideoFrame>,
    /// 上次成功解码的场头
    fields: Option<[FieldHeader; FIELD_COUNT]>,
    /// 已解码帧尚未被 receive_frame 取出
    pending: bool,
    /// 是否已收到刷新信号 (空包)
    flushing: bool,
}

impl FrwuDecoder {
    /// 以给定参数和分配器创建解码器
    pub fn new(config: StreamConfig, allocator: Box<dyn BufferAllocator>) -> Self {
        log_open(&config);
        Self {
            config: Some(config),
            allocator,
            picture: None,
            fields: None,
            pending: false,
            flushing: false,
        }
    }

    /// 注册表工厂: 创建未打开、使用默认分配器的解码器
    pub fn create() -> FrwuResult<Box<dyn Decoder>> {
        Ok(Box::new(Self {
            config: None,
            allocator: Box::new(DefaultAllocator::new()),
            picture: None,
            fields: None,
            pending: false,
            flushing: false,
        }))
    }

    /// 当前流参数
    pub fn config(&self) -> Option<&StreamConfig> {
        self.config.as_ref()
    }

    /// 当前持有的输出帧
    pub fn picture(&self) -> Option<&VideoFrame> {
        self.picture.as_ref()
    }

    /// 上次成功解码的两个场头
    pub fn field_headers(&self) -> Option<&[FieldHeader; FIELD_COUNT]> {
        self.fields.as_ref()
    }

    /// 解码一个数据包
    ///
    /// 成功时返回输出帧的引用 (在下次解码或关闭前有效) 以及消耗的字节数 (整个包).
    /// 失败时不持有任何帧.
    pub fn decode_frame(&mut self, data: &[u8]) -> FrwuResult<(&VideoFrame, usize)> {
        self.release_picture();
        self.fields = None;

        let config = self
            .config
            .ok_or_else(|| FrwuError::Codec("解码器未打开, 请先调用 open()".into()))?;

        if data.len() < config.min_packet_size {
            error!(
                "数据包过小: {} 字节, 至少需要 {}",
                data.len(),
                config.min_packet_size
            );
            return Err(FrwuError::PacketTooSmall {
                required: config.min_packet_size,
                available: data.len(),
            });
        }

        let tag = LittleEndian::read_u32(&data[..TAG_SIZE]);
        if tag != FRWU_TAG {
            error!("包头标记错误: 0x{tag:08x}");
            return Err(FrwuError::IncorrectMarker { found: tag });
        }

        let mut picture = VideoFrame::new(config.width, config.height, OUTPUT_FORMAT);
        if let Err(e) = self.allocator.acquire_buffer(&mut picture) {
            error!("获取输出缓冲区失败: {e}");
            return Err(e);
        }

        let linesize = picture.linesize.first().copied().unwrap_or(0);
        if linesize < config.row_bytes {
            error!("输出缓冲区行距 {linesize} 小于行字节数 {}", config.row_bytes);
            self.allocator.release_buffer(&mut picture);
            return Err(FrwuError::BufferAcquisitionFailed(format!(
                "行距 {linesize} 小于 {}",
                config.row_bytes
            )));
        }

        picture.picture_type = PictureType::I;
        picture.is_keyframe = true;
        picture.interlaced = true;
        picture.top_field_first = true;

        match scatter_fields(&config, &data[TAG_SIZE..], &mut picture) {
            Ok(fields) => self.fields = Some(fields),
            Err(e) => {
                self.allocator.release_buffer(&mut picture);
                return Err(e);
            }
        }

        let picture = self.picture.insert(picture);
        Ok((&*picture, data.len()))
    }

    /// 关闭解码器, 归还持有的帧. 可重复调用.
    pub fn close(&mut self) {
        self.release_picture();
        self.pending = false;
    }

    fn release_picture(&mut self) {
        if let Some(mut picture) = self.picture.take() {
            self.allocator.release_buffer(&mut picture);
        }
    }
}

fn log_open(config: &StreamConfig) {
    debug!(
        "打开 frwu 解码器: {}x{}, 格式={}",
        config.width, config.height, OUTPUT_FORMAT
    );
}

/// 逐场解析并把像素行交错写入输出帧
///
/// 场 `field` 的第 `i` 行写到输出帧第 `2 * i + field` 行.
fn scatter_fields(
    config: &StreamConfig,
    mut buf: &[u8],
    picture: &mut VideoFrame,
) -> FrwuResult<[FieldHeader; FIELD_COUNT]> {
    let mut headers = [FieldHeader::default(); FIELD_COUNT];
    for (field, slot) in headers.iter_mut().enumerate() {
        if buf.len() < FIELD_HEADER_SIZE {
            error!("场 {field} 缺少场头: 剩余 {} 字节", buf.len());
            return Err(FrwuError::PacketTooSmall {
                required: FIELD_HEADER_SIZE,
                available: buf.len(),
            });
        }
        let (raw_header, rest) = buf.split_at(FIELD_HEADER_SIZE);
        let header = FieldHeader::parse(raw_header);

        let field_height = config.field_height(field);
        let min_field_size = config.min_field_size(field);
        let field_size = header.size as usize;
        if field_size < min_field_size {
            error!("场 {field} 大小 {field_size} 过小 (至少需要 {min_field_size})");
            return Err(FrwuError::FieldTooSmall {
                field,
                size: header.size,
                required: min_field_size,
            });
        }
        if rest.len() < field_size {
            error!(
                "数据包过小: 场 {field} 需要 {field_size} 字节, 剩余 {}",
                rest.len()
            );
            return Err(FrwuError::PacketTooSmall {
                required: field_size,
                available: rest.len(),
            });
        }

        let (payload, next) = rest.split_at(field_size);
        for (i, src) in payload
            .chunks_exact(config.row_bytes)
            .take(field_height)
            .enumerate()
        {
            let y = 2 * i + field;
            let dst = picture.row_mut(0, y).ok_or_else(|| {
                FrwuError::BufferAcquisitionFailed(format!("输出缓冲区容不下第 {y} 行"))
            })?;
            dst.copy_from_slice(src);
        }
        if field_size > min_field_size {
            debug!("场 {field} 跳过 {} 字节填充", field_size - min_field_size);
        }

        *slot = header;
        buf = next;
    }
    Ok(headers)
}

impl Decoder for FrwuDecoder {
    fn codec_id(&self) -> CodecId {
        CodecId::Frwu
    }

    fn name(&self) -> &str {
        "frwu"
    }

    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities::DR1
    }

    fn open(&mut self, params: &CodecParameters) -> FrwuResult<()> {
        let config = StreamConfig::from_params(params)?;
        self.close();
        self.config = Some(config);
        self.fields = None;
        self.flushing = false;
        log_open(&config);
        Ok(())
    }

    fn send_packet(&mut self, packet: &Packet) -> FrwuResult<()> {
        if self.config.is_none() {
            return Err(FrwuError::Codec("解码器未打开, 请先调用 open()".into()));
        }
        if self.pending {
            return Err(FrwuError::NeedMoreData);
        }

        // 空包 = flush
        if packet.is_empty() {
            self.flushing = true;
            return Ok(());
        }

        self.decode_frame(&packet.data)?;
        if let Some(picture) = self.picture.as_mut() {
            picture.pts = packet.pts;
            picture.time_base = packet.time_base;
            picture.duration = packet.duration;
        }
        self.pending = true;
        Ok(())
    }

    fn receive_frame(&mut self) -> FrwuResult<VideoFrame> {
        if self.pending {
            self.pending = false;
            if let Some(picture) = &self.picture {
                return Ok(picture.clone());
            }
        }
        if self.flushing {
            return Err(FrwuError::Eof);
        }
        Err(FrwuError::NeedMoreData)
    }

    fn flush(&mut self) {
        self.close();
        self.fields = None;
        self.flushing = false;
    }

    fn close(&mut self) {
        FrwuDecoder::close(self);
    }
}

impl Drop for FrwuDecoder {
    fn drop(&mut self) {
        self.release_picture();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use frwu_core::Rational;
    use std::sync::{Arc, Mutex};

    /// 记录申请/归还次数的分配器
    #[derive(Default)]
    struct Counts {
        acquired: usize,
        released: usize,
    }

    struct CountingAllocator {
        inner: DefaultAllocator,
        counts: Arc<Mutex<Counts>>,
        fail: bool,
    }

    impl CountingAllocator {
        fn new(align: usize) -> (Self, Arc<Mutex<Counts>>) {
            let counts = Arc::new(Mutex::new(Counts::default()));
            let alloc = Self {
                inner: DefaultAllocator::with_alignment(align).unwrap(),
                counts: Arc::clone(&counts),
                fail: false,
            };
            (alloc, counts)
        }
    }

    impl BufferAllocator for CountingAllocator {
        fn acquire_buffer(&mut self, frame: &mut VideoFrame) -> FrwuResult<()> {
            if self.fail {
                return Err(FrwuError::BufferAcquisitionFailed("测试".into()));
            }
            self.inner.acquire_buffer(frame)?;
            self.counts.lock().unwrap().acquired += 1;
            Ok(())
        }

        fn release_buffer(&mut self, frame: &mut VideoFrame) {
            if frame.has_buffer() {
                self.counts.lock().unwrap().released += 1;
            }
            self.inner.release_buffer(frame);
        }
    }

    /// 返回行距小于一行像素字节数的缓冲区
    struct NarrowStrideAllocator {
        counts: Arc<Mutex<Counts>>,
    }

    impl BufferAllocator for NarrowStrideAllocator {
        fn acquire_buffer(&mut self, frame: &mut VideoFrame) -> FrwuResult<()> {
            frame.data = vec![vec![0u8; 64]];
            frame.linesize = vec![4];
            self.counts.lock().unwrap().acquired += 1;
            Ok(())
        }

        fn release_buffer(&mut self, frame: &mut VideoFrame) {
            if frame.has_buffer() {
                self.counts.lock().unwrap().released += 1;
            }
            frame.data.clear();
            frame.linesize.clear();
        }
    }

    fn outstanding(counts: &Arc<Mutex<Counts>>) -> usize {
        let c = counts.lock().unwrap();
        c.acquired - c.released
    }

    /// 构造数据包, 第 `field` 场每行填充为 `(field, row)` 可辨识的字节
    fn build_packet(width: u32, height: u32, padding: [usize; 2]) -> Vec<u8> {
        let config = StreamConfig::new(width, height).unwrap();
        let mut pkt = b"FRW1".to_vec();
        for field in 0..2 {
            let rows = config.field_height(field);
            let size = config.min_field_size(field) + padding[field];
            pkt.extend_from_slice(&[0x80 * field as u8, 0, 0, field as u8]);
            pkt.extend_from_slice(&(size as u32).to_le_bytes());
            for i in 0..rows {
                pkt.extend(std::iter::repeat_n(row_byte(field, i), config.row_bytes()));
            }
            pkt.extend(std::iter::repeat_n(0xEE, padding[field]));
        }
        pkt
    }

    fn row_byte(field: usize, row: usize) -> u8 {
        (field * 0x40 + row + 1) as u8
    }

    fn decoder(width: u32, height: u32) -> FrwuDecoder {
        FrwuDecoder::new(
            StreamConfig::new(width, height).unwrap(),
            Box::new(DefaultAllocator::new()),
        )
    }

    #[test]
    fn test_odd_width_rejected() {
        for height in [1, 2, 3, 480] {
            assert!(matches!(
                StreamConfig::new(5, height),
                Err(FrwuError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(StreamConfig::new(0, 4).is_err());
        assert!(StreamConfig::new(4, 0).is_err());
    }

    #[test]
    fn test_field_heights() {
        let config = StreamConfig::new(4, 5).unwrap();
        assert_eq!(config.field_height(0), 3);
        assert_eq!(config.field_height(1), 2);
        assert_eq!(config.min_field_size(0), 24);
        assert_eq!(config.min_packet_size(), 4 * 2 * 5 + 20);
    }

    #[test]
    fn test_tag_value() {
        assert_eq!(FRWU_TAG, 0x3157_5246);
    }

    #[test]
    fn test_decode_4x4_interleaves_fields() {
        let mut dec = decoder(4, 4);
        let pkt = build_packet(4, 4, [0, 0]);
        assert_eq!(pkt.len(), 52);

        let (pic, consumed) = dec.decode_frame(&pkt).unwrap();
        assert_eq!(consumed, 52);
        assert_eq!(pic.pixel_format, PixelFormat::Uyvy422);
        assert_eq!(pic.picture_type, PictureType::I);
        assert!(pic.is_keyframe && pic.interlaced && pic.top_field_first);
        assert_eq!(pic.row(0, 0).unwrap(), &[row_byte(0, 0); 8]);
        assert_eq!(pic.row(0, 1).unwrap(), &[row_byte(1, 0); 8]);
        assert_eq!(pic.row(0, 2).unwrap(), &[row_byte(0, 1); 8]);
        assert_eq!(pic.row(0, 3).unwrap(), &[row_byte(1, 1); 8]);
    }

    #[test]
    fn test_decode_odd_height() {
        let mut dec = decoder(2, 3);
        let pkt = build_packet(2, 3, [0, 0]);
        let (pic, _) = dec.decode_frame(&pkt).unwrap();
        assert_eq!(pic.row(0, 0).unwrap(), &[row_byte(0, 0); 4]);
        assert_eq!(pic.row(0, 1).unwrap(), &[row_byte(1, 0); 4]);
        assert_eq!(pic.row(0, 2).unwrap(), &[row_byte(0, 1); 4]);
    }

    #[test]
    fn test_decode_height_one() {
        let mut dec = decoder(2, 1);
        let pkt = build_packet(2, 1, [0, 0]);
        assert_eq!(pkt.len(), 24);
        let (pic, _) = dec.decode_frame(&pkt).unwrap();
        assert_eq!(pic.row(0, 0).unwrap(), &[row_byte(0, 0); 4]);
    }

    #[test]
    fn test_padding_skipped() {
        let mut dec = decoder(4, 4);
        let pkt = build_packet(4, 4, [5, 3]);
        let (pic, consumed) = dec.decode_frame(&pkt).unwrap();
        assert_eq!(consumed, pkt.len());
        assert!(pic.data[0].iter().all(|&b| b != 0xEE));
        assert_eq!(pic.row(0, 1).unwrap(), &[row_byte(1, 0); 8]);
        assert_eq!(pic.row(0, 3).unwrap(), &[row_byte(1, 1); 8]);

        let fields = dec.field_headers().unwrap();
        assert_eq!(fields[0].size, 21);
        assert_eq!(fields[1].size, 19);
        assert_eq!(fields[1].flags, [0x80, 0, 0, 1]);
    }

    #[test]
    fn test_stride_padding_untouched() {
        let (alloc, _) = CountingAllocator::new(32);
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let pkt = build_packet(4, 4, [0, 0]);
        let (pic, _) = dec.decode_frame(&pkt).unwrap();
        assert_eq!(pic.linesize[0], 32);
        for y in 0..4 {
            let row = &pic.data[0][y * 32..(y + 1) * 32];
            assert!(row[8..].iter().all(|&b| b == 0));
        }
        assert_eq!(pic.row(0, 2).unwrap(), &[row_byte(0, 1); 8]);
    }

    #[test]
    fn test_packet_too_small() {
        let (alloc, counts) = CountingAllocator::new(1);
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let pkt = build_packet(4, 4, [0, 0]);
        let err = dec.decode_frame(&pkt[..51]).unwrap_err();
        assert!(matches!(
            err,
            FrwuError::PacketTooSmall {
                required: 52,
                available: 51
            }
        ));
        assert_eq!(counts.lock().unwrap().acquired, 0);
        assert!(dec.picture().is_none());
    }

    #[test]
    fn test_incorrect_marker_before_acquire() {
        let (alloc, counts) = CountingAllocator::new(1);
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let mut pkt = build_packet(4, 4, [0, 0]);
        pkt[3] = b'2';
        let err = dec.decode_frame(&pkt).unwrap_err();
        assert!(matches!(err, FrwuError::IncorrectMarker { found } if found == u32::from_le_bytes(*b"FRW2")));
        assert_eq!(counts.lock().unwrap().acquired, 0);
    }

    #[test]
    fn test_field_size_too_small() {
        let (alloc, counts) = CountingAllocator::new(1);
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        // 场 1 声明 8 字节, 总长度依旧足够
        let mut pkt = build_packet(4, 4, [0, 0]);
        pkt.extend_from_slice(&[0u8; 16]);
        let field1_size_at = 4 + 8 + 16 + 4;
        pkt[field1_size_at..field1_size_at + 4].copy_from_slice(&8u32.to_le_bytes());

        let err = dec.decode_frame(&pkt).unwrap_err();
        assert!(matches!(
            err,
            FrwuError::FieldTooSmall {
                field: 1,
                size: 8,
                required: 16
            }
        ));
        assert!(err.is_invalid_data());
        assert!(dec.picture().is_none());
        assert_eq!(outstanding(&counts), 0);
    }

    #[test]
    fn test_field_overruns_packet() {
        let mut dec = decoder(4, 4);
        let mut pkt = build_packet(4, 4, [0, 0]);
        // 场 0 之后只剩 40 字节
        pkt[8..12].copy_from_slice(&41u32.to_le_bytes());
        let err = dec.decode_frame(&pkt).unwrap_err();
        assert!(matches!(
            err,
            FrwuError::PacketTooSmall {
                required: 41,
                available: 40
            }
        ));
        assert!(dec.picture().is_none());
    }

    #[test]
    fn test_missing_second_field_header() {
        let mut dec = decoder(4, 4);
        let mut pkt = build_packet(4, 4, [0, 0]);
        // 场 0 吞掉场 1 的全部数据, 只留 4 字节
        pkt[8..12].copy_from_slice(&36u32.to_le_bytes());
        let err = dec.decode_frame(&pkt).unwrap_err();
        assert!(matches!(
            err,
            FrwuError::PacketTooSmall {
                required: FIELD_HEADER_SIZE,
                available: 4
            }
        ));
    }

    #[test]
    fn test_acquire_failure_propagates() {
        let (mut alloc, _) = CountingAllocator::new(1);
        alloc.fail = true;
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let err = dec.decode_frame(&build_packet(4, 4, [0, 0])).unwrap_err();
        assert!(matches!(err, FrwuError::BufferAcquisitionFailed(_)));
    }

    #[test]
    fn test_narrow_stride_rejected_and_released() {
        // 4x4 UYVY 每行 8 字节, 分配器只给 4 字节行距
        let counts = Arc::new(Mutex::new(Counts::default()));
        let alloc = NarrowStrideAllocator {
            counts: Arc::clone(&counts),
        };
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let err = dec.decode_frame(&build_packet(4, 4, [0, 0])).unwrap_err();
        assert!(matches!(err, FrwuError::BufferAcquisitionFailed(_)));
        assert!(dec.picture().is_none());
        assert!(dec.field_headers().is_none());
        assert_eq!(counts.lock().unwrap().acquired, 1);
        assert_eq!(outstanding(&counts), 0);
    }

    #[test]
    fn test_repeated_decode_releases_previous() {
        let (alloc, counts) = CountingAllocator::new(1);
        let mut dec = FrwuDecoder::new(StreamConfig::new(4, 4).unwrap(), Box::new(alloc));
        let pkt = build_packet(4, 4, [0, 0]);
        for _ in 0..3 {
            dec.decode_frame(&pkt).unwrap();
            assert_eq!(outstanding(&counts), 1);
        }
        // 失败的解码同样先归还上一帧
        dec.decode_frame(&pkt[..10]).unwrap_err();
        assert_eq!(outstanding(&counts), 0);

        dec.decode_frame(&pkt).unwrap();
        dec.close();
        dec.close();
        assert_eq!(outstanding(&counts), 0);
        assert_eq!(counts.lock().unwrap().acquired, 4);
    }

    #[test]
    fn test_drop_releases_picture() {
        let (alloc, counts) = CountingAllocator::new(1);
        {
            let mut dec =
                FrwuDecoder::new(StreamConfig::new(2, 2).unwrap(), Box::new(alloc));
            dec.decode_frame(&build_packet(2, 2, [0, 0])).unwrap();
        }
        assert_eq!(outstanding(&counts), 0);
    }

    #[test]
    fn test_decoder_trait_lifecycle() {
        let mut dec = FrwuDecoder::create().unwrap();
        assert_eq!(dec.capabilities(), CodecCapabilities::DR1);

        let pkt = Packet::from_data(Bytes::from(build_packet(4, 4, [0, 0])));
        assert!(matches!(dec.send_packet(&pkt), Err(FrwuError::Codec(_))));

        dec.open(&CodecParameters::video(CodecId::Frwu, 4, 4))
            .unwrap();
        assert!(matches!(dec.receive_frame(), Err(FrwuError::NeedMoreData)));

        let mut pkt = pkt;
        pkt.pts = 7;
        pkt.time_base = Rational::new(1, 25);
        dec.send_packet(&pkt).unwrap();
        assert!(matches!(dec.send_packet(&pkt), Err(FrwuError::NeedMoreData)));

        let frame = dec.receive_frame().unwrap();
        assert_eq!(frame.pts, 7);
        assert_eq!(frame.time_base, Rational::new(1, 25));
        assert_eq!(frame.row(0, 1).unwrap(), &[row_byte(1, 0); 8]);
        assert!(matches!(dec.receive_frame(), Err(FrwuError::NeedMoreData)));

        dec.send_packet(&Packet::empty()).unwrap();
        assert!(matches!(dec.receive_frame(), Err(FrwuError::Eof)));
        dec.close();
    }

    #[test]
    fn test_decoder_trait_open_rejects_odd_width() {
        let mut dec = FrwuDecoder::create().unwrap();
        let err = dec
            .open(&CodecParameters::video(CodecId::Frwu, 3, 4))
            .unwrap_err();
        assert!(matches!(err, FrwuError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_decoder_usable_after_invalid_packet() {
        let mut dec = decoder(4, 4);
        assert!(dec.decode_frame(b"junk").unwrap_err().is_invalid_data());
        let pkt = build_packet(4, 4, [0, 0]);
        assert!(dec.decode_frame(&pkt).is_ok());
    }
}
