//! Builder 模式实现
//!
//! 提供链式构造 `Gripper` 实例的便捷方式。

use crate::config::GripperConfig;
use crate::error::DriverError;
use crate::gripper::Gripper;
use modelt_bus::{Dynamixel2PacketHandler, PacketHandler, PortHandler, SerialPortHandler};
use std::time::Duration;

/// Gripper Builder（链式构造）
///
/// 未设置的字段取 [`GripperConfig::default`] 的值。`build()` 只校验配置并创建控制器，
/// 不打开端口；调用方随后调用 [`Gripper::connect`]。
///
/// # Example
///
/// ```no_run
/// use modelt_driver::GripperBuilder;
///
/// let mut gripper = GripperBuilder::new()
///     .port("/dev/ttyUSB0")
///     .baud_rate(1_000_000)
///     .dxl_id(1)
///     .build()
///     .unwrap();
/// gripper.connect().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct GripperBuilder {
    config: GripperConfig,
    debug: bool,
}

impl GripperBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 串口设备路径（默认 Windows 为 `COM5`，其他平台为 `/dev/ttyUSB0`）
    pub fn port(mut self, port_name: impl Into<String>) -> Self {
        self.config.port_name = port_name.into();
        self
    }

    /// 波特率（默认 1M）
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.baud_rate = baud_rate;
        self
    }

    /// 设备 ID（默认 1）
    pub fn dxl_id(mut self, dxl_id: u8) -> Self {
        self.config.dxl_id = dxl_id;
        self
    }

    /// `set_defaults` 写入的电流上限（默认 400）
    pub fn current_limit(mut self, current_limit: i16) -> Self {
        self.config.default_current_limit = current_limit;
        self
    }

    pub fn open_hold(mut self, hold: Duration) -> Self {
        self.config.open_hold = hold;
        self
    }

    pub fn reboot_settle(mut self, settle: Duration) -> Self {
        self.config.reboot_settle = settle;
        self
    }

    /// 输出每次寄存器操作的 debug 记录
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// 当前累积的配置
    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    /// 使用串口后端构建
    pub fn build(
        self,
    ) -> Result<Gripper<SerialPortHandler, Dynamixel2PacketHandler>, DriverError> {
        let port = SerialPortHandler::new(self.config.port_name.clone());
        self.build_with(port, Dynamixel2PacketHandler::new())
    }

    /// 使用指定的端口与包处理器构建
    pub fn build_with<P: PortHandler, H: PacketHandler<P>>(
        self,
        port: P,
        handler: H,
    ) -> Result<Gripper<P, H>, DriverError> {
        self.config.validate()?;
        let mut gripper = Gripper::new(self.config, port, handler);
        gripper.set_debug(self.debug);
        Ok(gripper)
    }
}
