//! 启动流程与交互式单键会话

use crate::keys::{Key, KeySource};
use anyhow::Result;
use modelt_bus::{PacketHandler, PortHandler};
use modelt_driver::{DriverError, Gripper};
use std::time::Duration;
use tracing::warn;

/// 初始夹持电流
pub const INITIAL_STEP_CURRENT: i16 = 300;
/// 每次按键调整的电流步长
pub const STEP_CURRENT_INCREMENT: i16 = 50;
/// 默认夹持保持时间
pub const DEFAULT_LATCH_DURATION: Duration = Duration::from_secs(5);

/// 会话中可调的夹持电流，限制在 `[0, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCurrent {
    value: i16,
    upper: i16,
}

impl StepCurrent {
    pub fn new(upper: i16) -> Self {
        let upper = upper.max(0);
        Self {
            value: INITIAL_STEP_CURRENT.clamp(0, upper),
            upper,
        }
    }

    pub fn value(&self) -> i16 {
        self.value
    }

    pub fn increase(&mut self) -> i16 {
        self.value = self
            .value
            .saturating_add(STEP_CURRENT_INCREMENT)
            .min(self.upper);
        self.value
    }

    pub fn decrease(&mut self) -> i16 {
        self.value = self.value.saturating_sub(STEP_CURRENT_INCREMENT).max(0);
        self.value
    }
}

/// 按键对应的会话命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Quit,
    Open,
    Close,
    Reboot,
    IncreaseCurrent,
    DecreaseCurrent,
    /// 其他任意键：定时夹持
    Latch,
}

impl From<Key> for SessionCommand {
    fn from(key: Key) -> Self {
        match key {
            Key::Escape => Self::Quit,
            Key::Char('o') => Self::Open,
            Key::Char('l') => Self::Close,
            Key::Char('r') => Self::Reboot,
            Key::Char('q') => Self::IncreaseCurrent,
            Key::Char('a') => Self::DecreaseCurrent,
            Key::Char(_) | Key::Other => Self::Latch,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    /// 夹持电流上限
    pub upper_current: i16,
    pub latch_duration: Duration,
}

/// 连接、检查故障（有故障则重启）、写入默认配置
///
/// 只有连接失败会返回错误；故障检查与默认配置失败只记录警告。
pub fn initiate<P: PortHandler, H: PacketHandler<P>>(
    gripper: &mut Gripper<P, H>,
) -> Result<(), DriverError> {
    gripper.connect()?;

    match gripper.check_hw_error() {
        Ok(status) if status.fault_present() => {
            println!("⚠️  Hardware fault present, rebooting the actuator...");
            if let Err(e) = gripper.reboot_and_settle() {
                warn!("Reboot after hardware fault failed: {}", e);
            }
        },
        Ok(_) => {},
        Err(e) => warn!("Hardware error check failed: {}", e),
    }

    if let Err(e) = gripper.set_defaults() {
        warn!("Failed to apply defaults: {}", e);
    }
    Ok(())
}

fn print_menu(step: &StepCurrent) {
    println!("========================================");
    println!(
        "Current gripping current: {}. Press 'q' to increase and 'a' to reduce.",
        step.value()
    );
    println!("close gripper: 'l' | open gripper: 'o' | reboot: 'r' | quit: 'ESC'");
    println!("Any other key to latch closed state for 5 seconds!");
}

/// 单键会话循环，ESC 退出
pub fn run_session<P, H, K>(
    gripper: &mut Gripper<P, H>,
    keys: &mut K,
    options: SessionOptions,
) -> Result<()>
where
    P: PortHandler,
    H: PacketHandler<P>,
    K: KeySource,
{
    let mut step = StepCurrent::new(options.upper_current);

    loop {
        print_menu(&step);
        let key = keys.read_key()?;
        println!("{:?}", key);

        let result = match SessionCommand::from(key) {
            SessionCommand::Quit => break,
            SessionCommand::Open => gripper.open_gripper(),
            SessionCommand::Close => gripper.close_gripper(step.value()),
            SessionCommand::Reboot => gripper.reboot(),
            SessionCommand::IncreaseCurrent => {
                step.increase();
                Ok(())
            },
            SessionCommand::DecreaseCurrent => {
                step.decrease();
                Ok(())
            },
            SessionCommand::Latch => gripper.latch_gripping(options.latch_duration, step.value()),
        };

        if let Err(e) = result {
            println!("❌ {}", e);
        }
    }

    Ok(())
}

/// 关闭扭矩并断开连接
pub fn shutdown<P: PortHandler, H: PacketHandler<P>>(gripper: &mut Gripper<P, H>) {
    if let Err(e) = gripper.torque_off() {
        warn!("Failed to disable torque: {}", e);
    }
    gripper.disconnect();
}
