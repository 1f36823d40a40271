//! Model T 夹爪控制器
//!
//! 在寄存器传输之上实现连接生命周期、扭矩状态机、硬件故障检查与动作原语。
//!
//! # 扭矩状态机
//!
//! ```text
//!            torque_on / 任意动作原语
//!   ┌─────┐ ─────────────────────────> ┌────┐
//!   │ OFF │                            │ ON │
//!   └─────┘ <───────────────────────── └────┘
//!            torque_off / reboot
//! ```
//!
//! 所有操作都是同步阻塞的；保持类动作（夹持、张开）按配置时长阻塞调用线程。

use crate::config::GripperConfig;
use crate::error::{DriverError, TransportError};
use crate::state::{HardwareStatus, SessionState};
use crate::transport::RegisterTransport;
use modelt_bus::{PacketHandler, PortHandler};
use modelt_protocol::{
    CURRENT_LIMIT, GOAL_CURRENT, HARDWARE_ERROR_STATUS, HardwareErrorStatus, OPERATING_MODE,
    OperatingMode, Register, RegisterWidth, TORQUE_DISABLE, TORQUE_ENABLE, TORQUE_ENABLE_VALUE,
};
use std::time::Duration;
use tracing::{error, info, warn};

/// 夹爪控制器
///
/// 独占端口句柄；所有操作通过 `&mut self` 串行执行。
pub struct Gripper<P: PortHandler, H: PacketHandler<P>> {
    config: GripperConfig,
    transport: RegisterTransport<P, H>,
    state: SessionState,
}

impl<P: PortHandler, H: PacketHandler<P>> Gripper<P, H> {
    pub fn new(config: GripperConfig, port: P, handler: H) -> Self {
        let transport = RegisterTransport::new(port, handler, config.dxl_id);
        Self {
            config,
            transport,
            state: SessionState::default(),
        }
    }

    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn port(&self) -> &P {
        self.transport.port()
    }

    // ========================================================================
    // 连接
    // ========================================================================

    /// 打开端口并设置波特率
    ///
    /// 失败时返回 [`DriverError::PortOpen`] / [`DriverError::BaudRate`]（均为致命错误），
    /// 是否终止进程由调用方决定。
    pub fn connect(&mut self) -> Result<(), DriverError> {
        let port_name = self.config.port_name.clone();
        let baud_rate = self.config.baud_rate;
        let port = self.transport.port_mut();

        if let Err(source) = port.open_port() {
            error!("Failed to open the port {}: {}", port_name, source);
            return Err(DriverError::PortOpen {
                port: port_name,
                source,
            });
        }
        info!("Succeeded to open the port {}", port_name);

        if let Err(source) = port.set_baud_rate(baud_rate) {
            error!("Failed to change the baudrate to {}: {}", baud_rate, source);
            port.close_port();
            return Err(DriverError::BaudRate { baud_rate, source });
        }
        info!("Succeeded to change the baudrate to {}", baud_rate);

        self.state.connected = true;
        info!("Model T has been successfully connected.");
        Ok(())
    }

    /// 关闭端口（仅在已连接时）
    pub fn disconnect(&mut self) {
        if self.state.connected {
            self.transport.port_mut().close_port();
            self.state.connected = false;
            info!("Model T has been disconnected.");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.connected
    }

    /// 开关寄存器操作的 debug 记录
    pub fn set_debug(&mut self, enabled: bool) {
        self.state.debug_enabled = enabled;
        self.transport.set_trace(enabled);
    }

    // ========================================================================
    // 配置
    // ========================================================================

    /// 设置电流上限
    ///
    /// 扭矩开启时直接拒绝，不访问总线。
    pub fn set_current_limit(&mut self, value: i16) -> Result<(), DriverError> {
        if self.state.torque_enabled {
            error!("Torque is currently enabled. Disable torque before setting current limit.");
            return Err(DriverError::TorqueEnabled);
        }
        self.write_word(&CURRENT_LIMIT, value)?;
        info!("Current limit has been set to {}.", value);
        Ok(())
    }

    /// 读取电流上限
    pub fn current_limit(&mut self) -> Result<i16, DriverError> {
        self.read_word(&CURRENT_LIMIT)
    }

    pub fn set_operating_mode(&mut self, mode: OperatingMode) -> Result<(), DriverError> {
        self.write_byte(&OPERATING_MODE, mode.into())?;
        info!("Operating mode has been set to {:?}.", mode);
        Ok(())
    }

    /// 写入默认电流上限，再切换到电流控制模式
    pub fn set_defaults(&mut self) -> Result<(), DriverError> {
        self.set_current_limit(self.config.default_current_limit)?;
        self.set_operating_mode(OperatingMode::Current)?;
        info!("Defaults have been successfully set.");
        Ok(())
    }

    // ========================================================================
    // 扭矩
    // ========================================================================

    /// 开启扭矩（已开启时不访问总线），返回结果状态
    pub fn torque_on(&mut self) -> Result<bool, DriverError> {
        if !self.state.torque_enabled {
            self.write_byte(&TORQUE_ENABLE, TORQUE_ENABLE_VALUE)?;
            self.state.torque_enabled = true;
        }
        Ok(self.state.torque_enabled)
    }

    /// 关闭扭矩（已关闭时不访问总线），返回结果状态
    pub fn torque_off(&mut self) -> Result<bool, DriverError> {
        if self.state.torque_enabled {
            self.write_byte(&TORQUE_ENABLE, TORQUE_DISABLE)?;
            self.state.torque_enabled = false;
        }
        Ok(self.state.torque_enabled)
    }

    pub fn is_torque_enabled(&self) -> bool {
        self.state.torque_enabled
    }

    // ========================================================================
    // 故障
    // ========================================================================

    /// 读取硬件错误状态
    ///
    /// - 通信失败或非 ALERT 的设备错误：返回 `Err`
    /// - ALERT：返回 [`HardwareStatus::Fault`]，并按优先级记录故障原因
    /// - 错误字节为零：返回 [`HardwareStatus::Healthy`]
    pub fn check_hw_error(&mut self) -> Result<HardwareStatus, DriverError> {
        match self.transport.read_byte(HARDWARE_ERROR_STATUS.address) {
            Ok(_) => Ok(HardwareStatus::Healthy),
            Err(TransportError::Device { error, data }) if error.is_alert() => {
                let status = HardwareErrorStatus::new(data.unwrap_or_default() as u8);
                error!("[ID:{:03}] {}", self.transport.id(), status);
                Ok(HardwareStatus::Fault(status))
            },
            Err(err) => {
                error!("{}", err);
                Err(err.into())
            },
        }
    }

    /// `(fault_present, comm_ok)`
    pub fn check_hw_error_flags(&mut self) -> (bool, bool) {
        match self.check_hw_error() {
            Ok(status) => (status.fault_present(), true),
            Err(_) => (false, false),
        }
    }

    /// 重启执行器；成功后扭矩处于关闭状态
    ///
    /// 失败时扭矩状态保持不变。
    pub fn reboot(&mut self) -> Result<(), DriverError> {
        match self.transport.reboot() {
            Ok(()) => {
                self.state.torque_enabled = false;
                info!("[ID:{:03}] Reboot has been requested.", self.transport.id());
                Ok(())
            },
            Err(err) => {
                warn!("Reboot failed: {}", err);
                Err(err.into())
            },
        }
    }

    /// 重启并等待设备就绪
    pub fn reboot_and_settle(&mut self) -> Result<(), DriverError> {
        self.reboot()?;
        spin_sleep::sleep(self.config.reboot_settle);
        Ok(())
    }

    // ========================================================================
    // 动作原语
    // ========================================================================

    /// 以 `goal_current` 夹持 `duration`，随后释放
    pub fn latch_gripping(
        &mut self,
        duration: Duration,
        goal_current: i16,
    ) -> Result<(), DriverError> {
        info!("Gripping...");
        self.torque_on()?;
        self.write_word(&GOAL_CURRENT, goal_current)?;
        spin_sleep::sleep(duration);
        self.write_word(&GOAL_CURRENT, 0)?;
        info!("Released...");
        Ok(())
    }

    /// 以张开电流保持一段时间后归零
    pub fn open_gripper(&mut self) -> Result<(), DriverError> {
        self.torque_on()?;
        self.write_word(&GOAL_CURRENT, self.config.open_current)?;
        spin_sleep::sleep(self.config.open_hold);
        self.write_word(&GOAL_CURRENT, 0)?;
        info!("Gripper opened...");
        Ok(())
    }

    /// 以 `goal_current` 闭合，不自动释放
    pub fn close_gripper(&mut self, goal_current: i16) -> Result<(), DriverError> {
        self.torque_on()?;
        self.write_word(&GOAL_CURRENT, goal_current)?;
        info!("Gripper closed...");
        Ok(())
    }

    // ========================================================================
    // 内部
    // ========================================================================

    fn read_word(&mut self, register: &Register) -> Result<i16, DriverError> {
        debug_assert_eq!(register.width, RegisterWidth::Word, "{}", register.name);
        let result = self.transport.read_word(register.address);
        self.escalate(register, result)
    }

    fn write_byte(&mut self, register: &Register, value: u8) -> Result<(), DriverError> {
        debug_assert_eq!(register.width, RegisterWidth::Byte, "{}", register.name);
        let result = self.transport.write_byte(register.address, value);
        self.escalate(register, result)
    }

    fn write_word(&mut self, register: &Register, value: i16) -> Result<(), DriverError> {
        debug_assert_eq!(register.width, RegisterWidth::Word, "{}", register.name);
        let result = self.transport.write_word(register.address, value);
        self.escalate(register, result)
    }

    /// 记录失败；ALERT 时读取硬件错误状态并上报故障
    fn escalate<T>(
        &mut self,
        register: &Register,
        result: Result<T, TransportError>,
    ) -> Result<T, DriverError> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        error!("{} ({}): {}", register.name, register.address, err);
        if err.is_alert() {
            if let Ok(HardwareStatus::Fault(status)) = self.check_hw_error() {
                return Err(DriverError::HardwareFault(status));
            }
        }
        Err(err.into())
    }
}

impl<P: PortHandler, H: PacketHandler<P>> Drop for Gripper<P, H> {
    fn drop(&mut self) {
        self.disconnect();
    }
}
