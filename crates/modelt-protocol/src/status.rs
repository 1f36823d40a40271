//! 状态包错误字节与通信结果
//!
//! 一次寄存器访问的结果分三类：
//! - 通信失败（[`CommError`]）：请求/应答交换本身失败
//! - 设备错误（[`PacketError`]）：交换成功，但状态包错误字节非零
//! - 成功：错误字节为零

use bilge::prelude::*;
use std::fmt;
use thiserror::Error;

/// 状态包错误字节位域
///
/// - Bit 0-6: 错误号
/// - Bit 7: ALERT（设备锁存了硬件故障）
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy)]
pub struct StatusErrorByte {
    pub error_number: u7, // Bit 0-6: 错误号
    pub alert: bool,      // Bit 7: ALERT
}

/// 状态包错误号
#[derive(Debug, Clone, Copy, PartialEq, Eq, num_enum::FromPrimitive)]
#[repr(u8)]
pub enum PacketErrorKind {
    /// 无错误号（仅 ALERT）
    None = 0,
    /// 指令处理失败
    ResultFail = 1,
    /// 未定义或错误的指令
    Instruction = 2,
    /// CRC 不匹配
    Crc = 3,
    /// 数据超出范围
    DataRange = 4,
    /// 数据长度不匹配
    DataLength = 5,
    /// 数据超出限制值
    DataLimit = 6,
    /// 地址不可读写
    Access = 7,
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl PacketErrorKind {
    /// 诊断描述
    pub fn description(self) -> &'static str {
        match self {
            Self::None => "no error number",
            Self::ResultFail => "Failed to process the instruction packet",
            Self::Instruction => "Undefined instruction or incorrect instruction",
            Self::Crc => "CRC doesn't match",
            Self::DataRange => "The data value is out of range",
            Self::DataLength => "The data length does not match as expected",
            Self::DataLimit => "The data value exceeds the limit value",
            Self::Access => "Writing or reading is not available to target address",
            Self::Unknown(_) => "Unknown error code",
        }
    }
}

/// 设备返回的非零错误字节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketError(u8);

impl PacketError {
    /// 仅 ALERT 位置位的错误字节：设备锁存了硬件故障
    pub const ALERT: u8 = 0x80;

    /// 解析错误字节，零表示成功，返回 `None`
    pub fn from_raw(raw: u8) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// 原始错误字节
    pub fn raw(self) -> u8 {
        self.0
    }

    fn bits(self) -> StatusErrorByte {
        StatusErrorByte::from(self.0)
    }

    /// 错误字节是否恰好为 ALERT
    ///
    /// 为 ALERT 时调用方必须读取硬件错误状态寄存器确认故障原因。
    /// ALERT 位与错误号同时置位时按指令被拒绝处理。
    pub fn is_alert(self) -> bool {
        self.0 == Self::ALERT
    }

    /// 错误号
    pub fn kind(self) -> PacketErrorKind {
        PacketErrorKind::from(self.bits().error_number().value())
    }
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_alert() {
            write!(
                f,
                "[RxPacketError] Hardware error occurred. Check the error at Control Table (Hardware Error Status)!"
            )
        } else {
            write!(f, "[RxPacketError] {}!", self.kind().description())
        }
    }
}

impl std::error::Error for PacketError {}

/// 通信失败（请求/应答交换失败）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("[TxRxResult] Port is not open!")]
    PortNotOpen,

    #[error("[TxRxResult] Failed transmit instruction packet!")]
    TxFail,

    #[error("[TxRxResult] Failed get status packet from device!")]
    RxFail,

    #[error("[TxRxResult] There is no status packet!")]
    RxTimeout,

    #[error("[TxRxResult] Incorrect status packet: {0}")]
    RxCorrupt(String),
}
