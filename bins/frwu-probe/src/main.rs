//! frwu-probe - FRWU 码流探测与解码工具
//!
//! 读取首尾相接的 FRWU 数据包文件, 逐包解码并输出每帧的场信息,
//! 可选把解码后的 UYVY 帧写入原始视频文件.

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, info};

use frwu_codec::{CodecId, FramePool, FrwuDecoder, FrwuParser, StreamConfig, VideoFrame};
use frwu_core::{Rational, Timestamp};

/// FRWU 码流探测与解码工具
#[derive(Parser, Debug)]
#[command(name = "frwu-probe", version, about = "Forward Uncompressed 码流探测工具")]
struct Cli {
    /// 输入文件路径 (首尾相接的 FRWU 数据包)
    input: PathBuf,

    /// 帧宽度 (像素, 必须为偶数)
    #[arg(long)]
    width: u32,

    /// 帧高度 (像素)
    #[arg(long)]
    height: u32,

    /// 帧率, 用于计算每帧时间
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(i32).range(1..))]
    fps: i32,

    /// 把解码帧 (紧密排列的 UYVY) 写入该文件
    #[arg(long)]
    dump: Option<PathBuf>,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 日志详细程度 (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================
// 输出结构体
// ============================================================

/// 完整探测结果
#[derive(Serialize, Debug)]
struct ProbeOutput {
    codec_name: &'static str,
    codec_long_name: &'static str,
    width: u32,
    height: u32,
    pixel_format: String,
    nb_packets: usize,
    total_bytes: usize,
    packets: Vec<PacketInfo>,
}

/// 单个数据包的信息
#[derive(Serialize, Debug)]
struct PacketInfo {
    index: usize,
    pos: usize,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pts_time: Option<f64>,
    picture_type: String,
    interlaced: bool,
    top_field_first: bool,
    linesize: usize,
    fields: Vec<FieldInfo>,
}

/// 场头信息
#[derive(Serialize, Debug)]
struct FieldInfo {
    /// flags 原始字节的十六进制
    flags: String,
    size: u32,
}

// ============================================================
// 主逻辑
// ============================================================

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init("frwu-probe", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    if let Err(e) = run(&cli) {
        error!("{e:#}");
        eprintln!("错误: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!("输入文件: {}", cli.input.display());
    let data = fs::read(&cli.input)
        .with_context(|| format!("无法读取文件 '{}'", cli.input.display()))?;

    let mut dump = cli
        .dump
        .as_ref()
        .map(|path| {
            File::create(path)
                .map(BufWriter::new)
                .with_context(|| format!("无法创建输出文件 '{}'", path.display()))
        })
        .transpose()?;

    let time_base = Rational::new(cli.fps, 1).invert();
    let output = probe_stream(&data, cli.width, cli.height, time_base, |frame| {
        if let Some(out) = dump.as_mut() {
            out.write_all(&frame.to_packed())
                .context("写入解码帧失败")?;
        }
        Ok(())
    })?;
    if let Some(mut out) = dump {
        out.flush().context("写入解码帧失败")?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output);
    }
    Ok(())
}

/// 分包并逐包解码, 每解出一帧调用一次 `on_frame`
fn probe_stream(
    data: &[u8],
    width: u32,
    height: u32,
    time_base: Rational,
    mut on_frame: impl FnMut(&VideoFrame) -> Result<()>,
) -> Result<ProbeOutput> {
    let config = StreamConfig::new(width, height).context("无效的流参数")?;
    let packets = FrwuParser::new(config)
        .split(data)
        .context("码流分包失败")?;
    debug!("共 {} 个数据包", packets.len());

    // 同一时刻最多借出一帧: 解码器必须先归还上一帧
    let pool = FramePool::new().with_max_outstanding(1);
    let mut decoder = FrwuDecoder::new(config, Box::new(pool));

    let mut infos = Vec::with_capacity(packets.len());
    let mut pos = 0usize;
    for (index, packet) in packets.iter().enumerate() {
        let (picture, consumed) = decoder
            .decode_frame(packet)
            .with_context(|| format!("第 {index} 个数据包解码失败 (偏移 {pos})"))?;
        on_frame(picture)?;

        let mut info = PacketInfo {
            index,
            pos,
            size: consumed,
            pts_time: Timestamp::new(index as i64, time_base).to_seconds(),
            picture_type: format!("{:?}", picture.picture_type),
            interlaced: picture.interlaced,
            top_field_first: picture.top_field_first,
            linesize: picture.linesize.first().copied().unwrap_or(0),
            fields: Vec::new(),
        };
        if let Some(headers) = decoder.field_headers() {
            info.fields = headers
                .iter()
                .map(|h| FieldInfo {
                    flags: hex(&h.flags),
                    size: h.size,
                })
                .collect();
        }
        debug!("数据包 #{index}: 偏移 {pos}, {consumed} 字节");
        infos.push(info);
        pos += consumed;
    }
    decoder.close();

    Ok(ProbeOutput {
        codec_name: CodecId::Frwu.name(),
        codec_long_name: CodecId::Frwu.long_name(),
        width,
        height,
        pixel_format: frwu_codec::decoders::frwu::OUTPUT_FORMAT.to_string(),
        nb_packets: infos.len(),
        total_bytes: pos,
        packets: infos,
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn print_text(output: &ProbeOutput) {
    println!(
        "编解码器: {} ({})",
        output.codec_name, output.codec_long_name
    );
    println!(
        "尺寸: {}x{}, 像素格式: {}",
        output.width, output.height, output.pixel_format
    );
    println!(
        "数据包: {} 个, 共 {} 字节",
        output.nb_packets, output.total_bytes
    );
    for p in &output.packets {
        let fields: Vec<String> = p
            .fields
            .iter()
            .map(|f| format!("flags={} size={}", f.flags, f.size))
            .collect();
        println!(
            "  #{:<4} pos={:<8} size={:<8} type={} tff={} [{}]",
            p.index,
            p.pos,
            p.size,
            p.picture_type,
            p.top_field_first,
            fields.join(", "),
        );
    }
}
