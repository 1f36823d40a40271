//! 输入验证模块
//!
//! 命令行参数在边界处解析与校验，作为 clap 的 `value_parser` 使用。

use anyhow::{Context, Result, bail};
use modelt_protocol::MAX_ID;

/// 解析设备 ID（0-252）
pub fn parse_dxl_id(s: &str) -> Result<u8> {
    let id: u16 = s
        .trim()
        .parse()
        .with_context(|| format!("设备 ID 必须是整数: {}", s))?;
    if id > MAX_ID as u16 {
        bail!("设备 ID {} 超出范围 [0, {}]", id, MAX_ID);
    }
    Ok(id as u8)
}

/// 解析电流上限（非负）
pub fn parse_current_limit(s: &str) -> Result<i16> {
    let value: i16 = s
        .trim()
        .parse()
        .with_context(|| format!("电流上限必须是 {} 以内的整数: {}", i16::MAX, s))?;
    if value < 0 {
        bail!("电流上限不能为负数: {}", value);
    }
    Ok(value)
}

/// 解析波特率（正整数）
pub fn parse_baud_rate(s: &str) -> Result<u32> {
    let value: u32 = s
        .trim()
        .parse()
        .with_context(|| format!("波特率必须是正整数: {}", s))?;
    if value == 0 {
        bail!("波特率必须大于 0");
    }
    Ok(value)
}
