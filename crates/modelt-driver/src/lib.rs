//! 驱动层模块
//!
//! 本模块提供 Model T 夹爪的设备驱动功能，包括：
//! - 寄存器传输适配（单次读写 + 结果分类）
//! - 连接生命周期与扭矩状态机
//! - 硬件故障检查（ALERT + 硬件错误状态寄存器）
//! - 动作原语（夹持、张开、闭合）
//!
//! # 使用场景
//!
//! ```no_run
//! use modelt_driver::GripperBuilder;
//! use std::time::Duration;
//!
//! let mut gripper = GripperBuilder::new().port("/dev/ttyUSB0").build()?;
//! gripper.connect()?;
//! if gripper.check_hw_error()?.fault_present() {
//!     gripper.reboot_and_settle()?;
//! }
//! gripper.set_defaults()?;
//! gripper.latch_gripping(Duration::from_secs(5), 300)?;
//! gripper.torque_off()?;
//! # Ok::<(), modelt_driver::DriverError>(())
//! ```

mod builder;
pub mod config;
mod error;
mod gripper;
pub mod state;
pub mod transport;

pub use builder::GripperBuilder;
pub use config::GripperConfig;
pub use error::{DriverError, TransportError};
pub use gripper::Gripper;
pub use state::{HardwareStatus, SessionState};
pub use transport::RegisterTransport;
