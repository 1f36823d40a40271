//! 夹爪会话配置
//!
//! 构造时确定，会话期间不再修改。

use crate::error::DriverError;
use modelt_protocol::MAX_ID;
use std::time::Duration;

/// 默认波特率
pub const DEFAULT_BAUD_RATE: u32 = 1_000_000;
/// 默认设备 ID
pub const DEFAULT_DXL_ID: u8 = 1;
/// 默认电流上限
pub const DEFAULT_CURRENT_LIMIT: i16 = 400;
/// 张开夹爪时的目标电流（负值为张开方向）
pub const DEFAULT_OPEN_CURRENT: i16 = -100;
/// 张开电流保持时间
pub const DEFAULT_OPEN_HOLD: Duration = Duration::from_millis(500);
/// 重启后等待设备就绪的时间
pub const DEFAULT_REBOOT_SETTLE: Duration = Duration::from_secs(1);

/// 平台默认串口
pub fn default_port_name() -> &'static str {
    if cfg!(windows) { "COM5" } else { "/dev/ttyUSB0" }
}

/// 执行器标识与时序参数
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GripperConfig {
    /// 串口设备路径
    pub port_name: String,
    pub baud_rate: u32,
    /// 总线地址（0-252）
    pub dxl_id: u8,
    /// `set_defaults` 写入的电流上限
    pub default_current_limit: i16,
    pub open_current: i16,
    pub open_hold: Duration,
    pub reboot_settle: Duration,
}

impl Default for GripperConfig {
    fn default() -> Self {
        Self {
            port_name: default_port_name().to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            dxl_id: DEFAULT_DXL_ID,
            default_current_limit: DEFAULT_CURRENT_LIMIT,
            open_current: DEFAULT_OPEN_CURRENT,
            open_hold: DEFAULT_OPEN_HOLD,
            reboot_settle: DEFAULT_REBOOT_SETTLE,
        }
    }
}

impl GripperConfig {
    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.port_name.is_empty() {
            return Err(DriverError::InvalidConfig("port name is empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(DriverError::InvalidConfig(
                "baudrate must be positive".to_string(),
            ));
        }
        if self.dxl_id > MAX_ID {
            return Err(DriverError::InvalidConfig(format!(
                "dxl id {} exceeds the maximum {}",
                self.dxl_id, MAX_ID
            )));
        }
        if self.default_current_limit < 0 {
            return Err(DriverError::InvalidConfig(format!(
                "current limit {} must not be negative",
                self.default_current_limit
            )));
        }
        if self.open_current >= 0 {
            return Err(DriverError::InvalidConfig(format!(
                "open current {} must be negative",
                self.open_current
            )));
        }
        Ok(())
    }
}
