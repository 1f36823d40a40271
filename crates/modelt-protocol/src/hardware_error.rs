//! 硬件错误状态 (Hardware Error Status, 地址 70)
//!
//! 状态包错误字节的 ALERT 位表示设备锁存了一个硬件故障，此时需要读取本寄存器确认原因。
//! 寄存器各位相互独立：
//!
//! - Bit 0: 输入电压异常
//! - Bit 2: 过热
//! - Bit 3: 电机编码器异常
//! - Bit 4: 电击（电路异常）
//! - Bit 5: 过载
//!
//! 多个位同时置位时，按 [`HARDWARE_ERROR_PRIORITY`] 的顺序取第一个作为上报原因。

use std::fmt;

/// 硬件故障原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HardwareErrorCause {
    /// 输入电压超出范围
    InputVoltage,
    /// 内部温度超出范围
    Overheating,
    /// 电机编码器异常
    MotorEncoder,
    /// 电路异常（电击）
    ElectricalShock,
    /// 持续负载超出能力
    Overload,
}

impl HardwareErrorCause {
    /// 人类可读的描述
    pub fn description(self) -> &'static str {
        match self {
            Self::InputVoltage => "input voltage error",
            Self::Overheating => "overheating error",
            Self::MotorEncoder => "motor encoder error",
            Self::ElectricalShock => "electric shock error",
            Self::Overload => "overload error",
        }
    }
}

impl fmt::Display for HardwareErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// 故障位优先级表：(位号, 原因)，按优先级从高到低排列
pub const HARDWARE_ERROR_PRIORITY: [(u8, HardwareErrorCause); 5] = [
    (0, HardwareErrorCause::InputVoltage),
    (2, HardwareErrorCause::Overheating),
    (3, HardwareErrorCause::MotorEncoder),
    (4, HardwareErrorCause::ElectricalShock),
    (5, HardwareErrorCause::Overload),
];

/// 硬件错误状态寄存器的原始值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardwareErrorStatus(u8);

impl HardwareErrorStatus {
    pub fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// 原始寄存器值
    pub fn raw(self) -> u8 {
        self.0
    }

    /// 按优先级返回第一个置位的故障原因
    pub fn cause(self) -> Option<HardwareErrorCause> {
        self.causes().next()
    }

    /// 按优先级返回所有置位的故障原因
    pub fn causes(self) -> impl Iterator<Item = HardwareErrorCause> {
        HARDWARE_ERROR_PRIORITY
            .into_iter()
            .filter(move |(bit, _)| (self.0 >> bit) & 1 == 1)
            .map(|(_, cause)| cause)
    }
}

impl From<u8> for HardwareErrorStatus {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

impl fmt::Display for HardwareErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "shutdown due to {}", cause),
            None => write!(f, "unrecognised hardware error status 0x{:02X}", self.0),
        }
    }
}
